//! The word store contract consumed by the import pipeline and the drill screens.

use serde::Serialize;

use crate::error::Result;
use crate::word::{CategoryInfo, SortField, WordRecord};

/// Why a bulk row was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// A stored word already uses this `english` key.
    AlreadyStored,
    /// An earlier row of the same batch uses this `english` key.
    DuplicateInBatch,
    /// `english` or `thai` is blank.
    Invalid,
}

/// One refused row of a bulk insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowConflict {
    /// Zero-based position in the submitted batch.
    pub index: usize,
    pub english: String,
    pub reason: ConflictReason,
}

/// Result of a successful bulk insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub inserted: usize,
    pub message: String,
}

/// Collection of word records keyed by `english`.
///
/// Implementations must treat `bulk_create` as all-or-nothing: either every
/// row is stored, or nothing is and the error lists each offending row.
pub trait WordStore {
    /// All words, in stored order or sorted by `sort`.
    fn list(&self, sort: Option<SortField>) -> Result<Vec<WordRecord>>;

    /// Words whose `english` or `thai` contains `term`. A blank term lists everything.
    fn search(&self, term: &str) -> Result<Vec<WordRecord>>;

    fn get(&self, english: &str) -> Result<Option<WordRecord>>;

    fn by_category(&self, category: &str) -> Result<Vec<WordRecord>>;

    fn categories(&self) -> Result<Vec<CategoryInfo>>;

    /// Store a new word. An existing `english` key is a conflict.
    fn create(&mut self, word: &WordRecord) -> Result<WordRecord>;

    /// Replace the word stored under `english`.
    fn update(&mut self, english: &str, word: &WordRecord) -> Result<WordRecord>;

    fn delete(&mut self, english: &str) -> Result<()>;

    /// Remove every word, returning how many were removed.
    fn delete_all(&mut self) -> Result<usize>;

    /// Persist the order given by `field` and return the reordered list.
    fn sort(&mut self, field: SortField) -> Result<Vec<WordRecord>>;

    fn bulk_create(&mut self, words: &[WordRecord]) -> Result<BulkSummary>;
}
