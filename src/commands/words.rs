//! Word list management commands.

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use dictbuddy_core::{Config, SortField, WordRecord, WordStore, CATEGORY_PLACEHOLDER};

use super::{open_store, word_table};

pub fn add(config: &Config, english: &str, thai: &str, category: Option<&str>) -> Result<()> {
    let mut store = open_store(config)?;
    let word = store.create(&WordRecord::new(english, thai, category))?;
    println!("เพิ่มคำว่า '{}' เรียบร้อยแล้ว", word.english);
    Ok(())
}

pub fn list(config: &Config, sort: Option<&str>, json: bool) -> Result<()> {
    let sort = sort.map(str::parse::<SortField>).transpose()?;
    let store = open_store(config)?;
    let words = store.list(sort)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&words)?);
    } else if words.is_empty() {
        println!("No words stored. Add some with `dictbuddy add` or `dictbuddy import`.");
    } else {
        println!("{}", word_table(&words));
        println!("{} word(s)", words.len());
    }
    Ok(())
}

pub fn search(config: &Config, term: &str) -> Result<()> {
    let store = open_store(config)?;
    let words = store.search(term)?;
    if words.is_empty() {
        println!("No words match '{}'.", term.trim());
    } else {
        println!("{}", word_table(&words));
    }
    Ok(())
}

pub fn delete(config: &Config, english: &str) -> Result<()> {
    let mut store = open_store(config)?;
    store.delete(english)?;
    println!("ลบคำว่า '{}' เรียบร้อยแล้ว", english.trim());
    Ok(())
}

pub fn clear(config: &Config, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("refusing to delete every word without --yes");
    }
    let mut store = open_store(config)?;
    let removed = store.delete_all()?;
    println!("Deleted {removed} word(s).");
    Ok(())
}

pub fn sort(config: &Config, field: &str) -> Result<()> {
    let field: SortField = field.parse()?;
    let mut store = open_store(config)?;
    let words = store.sort(field)?;
    println!("เรียงลำดับข้อมูลตาม {field} เรียบร้อย ({} word(s))", words.len());
    Ok(())
}

pub fn categories(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let categories = store.categories()?;
    if categories.is_empty() {
        println!("No words stored.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["หมวดหมู่", "Words"]);
    for info in &categories {
        table.add_row(vec![
            Cell::new(info.name.as_deref().unwrap_or(CATEGORY_PLACEHOLDER)),
            Cell::new(info.word_count),
        ]);
    }
    println!("{table}");
    Ok(())
}
