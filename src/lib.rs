//! Thai Dict Buddy core - English/Thai vocabulary drills and bulk import
//!
//! Provides the practice and quiz session engines, the CSV/spreadsheet import
//! pipeline, and a SQLite word store implementing the [`WordStore`] contract.

pub mod config;
pub mod db;
pub mod error;
pub mod fuzzy;
pub mod import;
pub mod practice;
pub mod progress;
pub mod questions;
pub mod queue;
pub mod quiz;
pub mod store;
pub mod timer;
pub mod word;

#[cfg(feature = "python")]
mod python;

pub use config::Config;
pub use db::SqliteWordStore;
pub use error::{DictError, ErrorKind, Result};
pub use fuzzy::{check_answer, normalize, AnswerCheck};
pub use import::{confirm_import, parse, parse_file, plan_import, ImportBatch, ImportPlan};
pub use practice::{Direction, Outcome, PracticeEngine, PracticeState};
pub use progress::{AttemptLog, AttemptStats, DrillMode};
pub use questions::{build_question, Choice, Question, CHOICE_COUNT};
pub use queue::{shuffled, SessionQueue};
pub use quiz::{AnswerResult, ChoiceStyle, QuizEngine, QuizState};
pub use store::{BulkSummary, ConflictReason, RowConflict, WordStore};
pub use timer::{AutoAdvance, FEEDBACK_DELAY};
pub use word::{CategoryInfo, SortField, WordRecord, CATEGORY_PLACEHOLDER};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Thai Dict Buddy Python module
#[cfg(feature = "python")]
#[pymodule]
fn dictbuddy_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python::register(m)
}
