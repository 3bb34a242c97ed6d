//! Bulk import of word lists from CSV/TXT and spreadsheet files.
//!
//! Rows are positional: `english,thai[,category]`. A header row is not
//! detected; it is validated like any other row.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DictError, Result};
use crate::store::{BulkSummary, WordStore};
use crate::word::WordRecord;

/// Why a row did not make it into the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    /// The row had this many fields, fewer than two.
    TooFewFields(usize),
    MissingEnglish,
    MissingThai,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooFewFields(n) => write!(f, "expected at least 2 fields, found {n}"),
            RejectReason::MissingEnglish => f.write_str("english is empty"),
            RejectReason::MissingThai => f.write_str("thai is empty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based line (or sheet row) the record started on.
    pub line: usize,
    pub reason: RejectReason,
}

/// Rows accepted from one file, with diagnostics for the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportBatch {
    pub accepted: Vec<WordRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// First rows of a batch plus how many were left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview<'a> {
    pub rows: &'a [WordRecord],
    pub more: usize,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn preview(&self, rows: usize) -> Preview<'_> {
        let shown = rows.min(self.accepted.len());
        Preview {
            rows: &self.accepted[..shown],
            more: self.accepted.len() - shown,
        }
    }
}

/// A batch split against the words already stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    /// Rows whose key is new to the store and to the batch.
    pub fresh: Vec<WordRecord>,
    /// Rows that would conflict: stored already, or repeated in the batch.
    pub duplicates: Vec<WordRecord>,
}

/// Parse delimited text into a batch.
///
/// Bad quoting fails the whole file; a file where every row is rejected
/// fails with [`DictError::NoValidRows`].
pub fn parse(raw_text: &str) -> Result<ImportBatch> {
    let text = raw_text.strip_prefix('\u{feff}').unwrap_or(raw_text);
    if text.trim().is_empty() {
        return Err(DictError::EmptyInput);
    }
    check_quoting(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DictError::MalformedFile {
            line: e.position().map(|p| p.line() as usize).unwrap_or(0),
            reason: e.to_string(),
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push((line, record.iter().map(str::to_string).collect()));
    }

    finish(filter_rows(rows))
}

/// Parse a file, choosing the reader by extension.
pub fn parse_file(path: &Path) -> Result<ImportBatch> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => {
            let bytes = std::fs::read(path)?;
            let text = String::from_utf8(bytes).map_err(|e| {
                let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
                DictError::MalformedFile {
                    line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
                    reason: "file is not valid UTF-8".to_string(),
                }
            })?;
            parse(&text)
        }
        "xlsx" | "xlsm" | "xls" | "ods" => parse_spreadsheet(path),
        _ => Err(DictError::UnsupportedFormat(extension)),
    }
}

/// Read the first sheet of a workbook through the same row filter.
fn parse_spreadsheet(path: &Path) -> Result<ImportBatch> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| DictError::Spreadsheet(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DictError::Spreadsheet("no sheets found".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DictError::Spreadsheet(e.to_string()))?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let rows: Vec<(usize, Vec<String>)> = range
        .rows()
        .enumerate()
        .filter_map(|(i, row)| {
            let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            // Blank rows are skipped, as blank lines are in text files
            (!cells.is_empty()).then_some((first_row + i + 1, cells))
        })
        .collect();

    if rows.is_empty() {
        return Err(DictError::EmptyInput);
    }
    finish(filter_rows(rows))
}

/// Helper to extract string from a spreadsheet cell
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

/// Apply the row rules in order, keeping the accepted rows' order.
pub fn filter_rows<I>(rows: I) -> ImportBatch
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
{
    let mut batch = ImportBatch::default();
    for (line, fields) in rows {
        if fields.len() < 2 {
            batch.rejected.push(RejectedRow {
                line,
                reason: RejectReason::TooFewFields(fields.len()),
            });
            continue;
        }

        let word = WordRecord::new(&fields[0], &fields[1], fields.get(2).map(String::as_str));
        let reason = if word.english.is_empty() {
            Some(RejectReason::MissingEnglish)
        } else if word.thai.is_empty() {
            Some(RejectReason::MissingThai)
        } else {
            None
        };

        match reason {
            Some(reason) => batch.rejected.push(RejectedRow { line, reason }),
            None => batch.accepted.push(word),
        }
    }
    batch
}

fn finish(batch: ImportBatch) -> Result<ImportBatch> {
    for row in &batch.rejected {
        warn!(line = row.line, reason = %row.reason, "import row rejected");
    }
    if batch.accepted.is_empty() {
        return Err(DictError::NoValidRows {
            rejected: batch.rejected_count(),
        });
    }
    info!(
        accepted = batch.len(),
        rejected = batch.rejected_count(),
        "import file parsed"
    );
    Ok(batch)
}

/// Reject unterminated quoted fields and stray text after a closing quote.
fn check_quoting(text: &str) -> Result<()> {
    let mut line = 1;
    let mut quote_line = 1;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => {
                    in_quotes = false;
                    if !matches!(chars.peek(), None | Some(',' | '\n' | '\r')) {
                        return Err(DictError::MalformedFile {
                            line,
                            reason: "unexpected text after closing quote".to_string(),
                        });
                    }
                }
                '\n' => line += 1,
                '\r' => {
                    line += 1;
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                }
                _ => {}
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                quote_line = line;
                at_field_start = false;
            }
            ',' => at_field_start = true,
            '\r' => {
                line += 1;
                at_field_start = true;
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(DictError::MalformedFile {
            line: quote_line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    Ok(())
}

/// Split a batch into rows the store would accept and rows it would refuse.
pub fn plan_import(batch: &ImportBatch, existing: &[WordRecord]) -> ImportPlan {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|w| w.english.to_ascii_lowercase())
        .collect();

    let mut plan = ImportPlan::default();
    for word in &batch.accepted {
        if seen.insert(word.english.to_ascii_lowercase()) {
            plan.fresh.push(word.clone());
        } else {
            plan.duplicates.push(word.clone());
        }
    }
    plan
}

/// Hand the accepted rows to the store as one bulk request.
pub fn confirm_import<S: WordStore + ?Sized>(
    store: &mut S,
    batch: ImportBatch,
) -> Result<BulkSummary> {
    store.bulk_create(&batch.accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteWordStore;
    use crate::store::ConflictReason;

    #[test]
    fn filters_rows_in_order() {
        let batch = parse("cat,แมว,animal\n,missing,x\ndog,สุนัข").unwrap();
        assert_eq!(
            batch.accepted,
            vec![
                WordRecord::new("cat", "แมว", Some("animal")),
                WordRecord::new("dog", "สุนัข", None),
            ]
        );
        assert_eq!(batch.rejected_count(), 1);
        assert_eq!(
            batch.rejected[0],
            RejectedRow {
                line: 2,
                reason: RejectReason::MissingEnglish
            }
        );
    }

    #[test]
    fn trims_fields_and_blank_category() {
        let batch = parse("  sun , ดวงอาทิตย์ ,   \r\nmoon,ดวงจันทร์,  sky \r\n").unwrap();
        assert_eq!(batch.accepted[0], WordRecord::new("sun", "ดวงอาทิตย์", None));
        assert_eq!(batch.accepted[1].category.as_deref(), Some("sky"));
        assert_eq!(batch.rejected_count(), 0);
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let batch = parse("\"ice cream\",\"ไอศกรีม, หวาน\"\n\"say \"\"hi\"\"\",ทักทาย\n").unwrap();
        assert_eq!(batch.accepted[0].thai, "ไอศกรีม, หวาน");
        assert_eq!(batch.accepted[1].english, "say \"hi\"");
    }

    #[test]
    fn rejects_short_rows_and_missing_thai() {
        let batch = parse("cat\ndog,\nbird,นก\n").unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.rejected[0].reason, RejectReason::TooFewFields(1));
        assert_eq!(batch.rejected[1].reason, RejectReason::MissingThai);
        assert_eq!(batch.rejected[1].line, 2);
    }

    #[test]
    fn header_row_is_treated_as_data() {
        let batch = parse("english,thai,category\ncat,แมว,animal\n").unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.accepted[0].english, "english");
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let err = parse("cat,แมว\ndog,\"สุนัข\nbird,นก\n").unwrap_err();
        match err {
            DictError::MalformedFile { line, .. } => assert_eq!(line, 2),
            other => panic!("expected malformed file, got {other:?}"),
        }
    }

    #[test]
    fn text_after_closing_quote_is_malformed() {
        let err = parse("cat,\"แมว\"x\n").unwrap_err();
        assert!(matches!(err, DictError::MalformedFile { line: 1, .. }));
    }

    #[test]
    fn whitespace_only_lines_are_skipped() {
        let batch = parse("cat,แมว\n   \ndog,สุนัข\n \t \nbird,\n").unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rejected_count(), 1);
        assert_eq!(batch.rejected[0].line, 5);
        assert_eq!(batch.rejected[0].reason, RejectReason::MissingThai);
    }

    #[test]
    fn quoting_errors_count_carriage_return_lines() {
        let err = parse("cat,แมว\rdog,\"สุนัข\rbird,นก\r").unwrap_err();
        assert!(matches!(err, DictError::MalformedFile { line: 2, .. }));

        let err = parse("cat,แมว\r\ndog,สุนัข\r\nbird,\"นก\"x\r\n").unwrap_err();
        assert!(matches!(err, DictError::MalformedFile { line: 3, .. }));
    }

    #[test]
    fn no_valid_rows_is_distinct_from_empty_input() {
        let err = parse("cat\n,แมว\n").unwrap_err();
        assert!(matches!(err, DictError::NoValidRows { rejected: 2 }));
        assert!(matches!(parse("  \n\n").unwrap_err(), DictError::EmptyInput));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let batch = parse("\u{feff}cat,แมว\n").unwrap();
        assert_eq!(batch.accepted[0].english, "cat");
    }

    #[test]
    fn preview_reports_remaining_rows() {
        let text: String = (0..7).map(|i| format!("w{i},ค{i}\n")).collect();
        let batch = parse(&text).unwrap();
        let preview = batch.preview(5);
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.more, 2);
        assert_eq!(batch.preview(10).more, 0);
    }

    #[test]
    fn parse_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("words.CSV");
        std::fs::write(&csv, "cat,แมว\n").unwrap();
        assert_eq!(parse_file(&csv).unwrap().len(), 1);

        let txt = dir.path().join("words.txt");
        std::fs::write(&txt, "dog,สุนัข,animal\n").unwrap();
        assert_eq!(parse_file(&txt).unwrap().accepted[0].english, "dog");

        let json = dir.path().join("words.json");
        std::fs::write(&json, "[]").unwrap();
        assert!(matches!(
            parse_file(&json),
            Err(DictError::UnsupportedFormat(ext)) if ext == "json"
        ));

        let latin1 = dir.path().join("latin1.csv");
        std::fs::write(&latin1, b"cat,meow\ncaf\xe9,x\n").unwrap();
        assert!(matches!(
            parse_file(&latin1),
            Err(DictError::MalformedFile { line: 2, .. })
        ));
    }

    #[test]
    fn spreadsheet_cells_render_as_text() {
        assert_eq!(cell_to_string(&Data::String("  cat ".into())), "cat");
        assert_eq!(cell_to_string(&Data::Float(2.0)), "2");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn broken_spreadsheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.xlsx");
        std::fs::write(&path, "not a zip").unwrap();
        assert!(matches!(parse_file(&path), Err(DictError::Spreadsheet(_))));
    }

    #[test]
    fn plan_splits_fresh_and_duplicate_rows() {
        let batch = parse("cat,แมว\ndog,สุนัข\nDOG,หมา\nbird,นก\n").unwrap();
        let existing = vec![WordRecord::new("Cat", "แมว", None)];
        let plan = plan_import(&batch, &existing);
        let fresh: Vec<_> = plan.fresh.iter().map(|w| w.english.as_str()).collect();
        let dupes: Vec<_> = plan.duplicates.iter().map(|w| w.english.as_str()).collect();
        assert_eq!(fresh, ["dog", "bird"]);
        assert_eq!(dupes, ["cat", "DOG"]);
    }

    #[test]
    fn confirm_import_is_atomic() {
        let mut store = SqliteWordStore::open_in_memory().unwrap();
        store.create(&WordRecord::new("cat", "แมว", None)).unwrap();

        let batch = parse("dog,สุนัข\ncat,แมว\n").unwrap();
        match confirm_import(&mut store, batch).unwrap_err() {
            DictError::BulkConflict { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].index, 1);
                assert_eq!(conflicts[0].reason, ConflictReason::AlreadyStored);
            }
            other => panic!("expected bulk conflict, got {other:?}"),
        }
        assert_eq!(store.list(None).unwrap().len(), 1);

        let batch = parse("dog,สุนัข\nbird,นก\n").unwrap();
        let summary = confirm_import(&mut store, batch).unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(store.list(None).unwrap().len(), 3);
    }
}
