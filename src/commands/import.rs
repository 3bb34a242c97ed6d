//! Bulk import from a CSV, TXT or spreadsheet file.

use std::path::Path;

use anyhow::{bail, Context, Result};

use dictbuddy_core::import::{parse_file, plan_import, ImportBatch};
use dictbuddy_core::{confirm_import, Config, ConflictReason, DictError, WordStore};

use super::{open_store, word_table};

pub fn execute(config: &Config, file: &Path, dry_run: bool, skip_existing: bool) -> Result<()> {
    let batch =
        parse_file(file).with_context(|| format!("failed to import {}", file.display()))?;

    print_preview(&batch, config.preview_rows);

    let mut store = open_store(config)?;
    let existing = store.list(None)?;
    let plan = plan_import(&batch, &existing);

    if dry_run {
        println!(
            "Dry run: {} new, {} duplicate(s). Nothing was stored.",
            plan.fresh.len(),
            plan.duplicates.len()
        );
        return Ok(());
    }

    let batch = if skip_existing {
        if !plan.duplicates.is_empty() {
            println!("Skipping {} duplicate(s).", plan.duplicates.len());
        }
        ImportBatch {
            accepted: plan.fresh,
            rejected: batch.rejected,
        }
    } else {
        batch
    };

    if batch.is_empty() {
        println!("Nothing new to import.");
        return Ok(());
    }

    match confirm_import(&mut store, batch) {
        Ok(summary) => {
            println!("{}", summary.message);
            Ok(())
        }
        Err(DictError::BulkConflict { conflicts }) => {
            for conflict in &conflicts {
                let reason = match conflict.reason {
                    ConflictReason::AlreadyStored => "already stored",
                    ConflictReason::DuplicateInBatch => "repeated in file",
                    ConflictReason::Invalid => "invalid",
                };
                eprintln!("  row {}: '{}' {}", conflict.index + 1, conflict.english, reason);
            }
            bail!(
                "import aborted, nothing was stored: {} conflicting row(s) (try --skip-existing)",
                conflicts.len()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn print_preview(batch: &ImportBatch, rows: usize) {
    let preview = batch.preview(rows);
    println!("ตัวอย่างข้อมูล ({} คำ):", batch.len());
    println!("{}", word_table(preview.rows));
    if preview.more > 0 {
        println!("และอีก {} คำ...", preview.more);
    }

    if !batch.rejected.is_empty() {
        println!("Rejected {} row(s):", batch.rejected_count());
        for row in &batch.rejected {
            println!("  line {}: {}", row.line, row.reason);
        }
    }
}
