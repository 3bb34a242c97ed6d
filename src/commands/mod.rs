//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use dictbuddy_core::{Config, SqliteWordStore, WordRecord};

pub mod drill;
pub mod import;
pub mod words;

/// Read the config file (if any) and apply the `--db` override.
pub fn load_config(path: Option<&Path>, db: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load_or_default(path).context("failed to load config")?;
    if let Some(db) = db {
        config.database_path = db;
    }
    Ok(config)
}

pub fn open_store(config: &Config) -> Result<SqliteWordStore> {
    SqliteWordStore::open(&config.database_path).with_context(|| {
        format!(
            "failed to open word store at {}",
            config.database_path.display()
        )
    })
}

pub fn word_table(words: &[WordRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["คำศัพท์", "คำแปล", "หมวดหมู่"]);
    for word in words {
        table.add_row(vec![
            Cell::new(&word.english),
            Cell::new(&word.thai),
            Cell::new(word.category_label()),
        ]);
    }
    table
}
