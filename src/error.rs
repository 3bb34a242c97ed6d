//! Error types shared by the drill engines, the import pipeline and the word store.

use thiserror::Error;

use crate::store::{ConflictReason, RowConflict};

/// Broad classes of failure, used to decide how an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input: malformed import rows, empty required fields.
    Validation,
    /// Duplicate `english` key reported by the store.
    Conflict,
    /// The store (database, disk) could not be reached or failed.
    Connectivity,
    /// An engine was driven in a way its current state does not allow.
    Engine,
}

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum DictError {
    /// A round was requested for an empty word list.
    #[error("word list is empty")]
    EmptyWordList,

    /// An answer was submitted while no word is current.
    #[error("no word is currently being drilled")]
    NoCurrentWord,

    /// Input arrived while feedback is on screen.
    #[error("input is locked while feedback is shown")]
    InputLocked,

    /// A quiz answer named a choice that does not exist.
    #[error("choice {0} does not exist")]
    InvalidChoice(usize),

    /// A word record failed validation.
    #[error("invalid word: {0}")]
    InvalidWord(String),

    /// The store refused a create because the key already exists.
    #[error("{0}")]
    Conflict(String),

    /// A bulk insert was rejected as a whole.
    #[error("bulk insert rejected: {} conflicting row(s)", .conflicts.len())]
    BulkConflict { conflicts: Vec<RowConflict> },

    /// The requested word does not exist.
    #[error("word not found: {0}")]
    NotFound(String),

    /// The import file is structurally broken (bad quoting).
    #[error("malformed file at line {line}: {reason}")]
    MalformedFile { line: usize, reason: String },

    /// The import file parsed, but every row was rejected.
    #[error("no valid rows found ({rejected} rejected)")]
    NoValidRows { rejected: usize },

    /// The import file is empty or blank.
    #[error("import file is empty")]
    EmptyInput,

    /// The import file has an extension we cannot read.
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    /// The spreadsheet reader failed.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// An error from the SQLite word store.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed or is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DictError::InvalidWord(_)
            | DictError::MalformedFile { .. }
            | DictError::NoValidRows { .. }
            | DictError::EmptyInput
            | DictError::UnsupportedFormat(_)
            | DictError::Spreadsheet(_)
            | DictError::NotFound(_)
            | DictError::Config(_) => ErrorKind::Validation,
            DictError::Conflict(_) | DictError::BulkConflict { .. } => ErrorKind::Conflict,
            DictError::Database(_) | DictError::Io(_) => ErrorKind::Connectivity,
            DictError::EmptyWordList
            | DictError::NoCurrentWord
            | DictError::InputLocked
            | DictError::InvalidChoice(_) => ErrorKind::Engine,
        }
    }

    /// Localized text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            DictError::Conflict(message) => message.clone(),
            DictError::BulkConflict { conflicts } => {
                let rows_with = |reason: ConflictReason| -> Vec<String> {
                    conflicts
                        .iter()
                        .filter(|c| c.reason == reason)
                        .map(|c| match reason {
                            ConflictReason::Invalid => format!("แถวที่ {}", c.index + 1),
                            _ => c.english.clone(),
                        })
                        .collect()
                };
                let parts: Vec<String> = [
                    (ConflictReason::AlreadyStored, "มีอยู่แล้ว"),
                    (ConflictReason::DuplicateInBatch, "ซ้ำในไฟล์"),
                    (ConflictReason::Invalid, "ข้อมูลไม่ครบ"),
                ]
                .into_iter()
                .filter_map(|(reason, label)| {
                    let rows = rows_with(reason);
                    (!rows.is_empty()).then(|| format!("{label}: {}", rows.join(", ")))
                })
                .collect();
                format!("นำเข้าไม่สำเร็จ {}", parts.join("; "))
            }
            DictError::NotFound(_) => "ไม่พบคำศัพท์นี้".to_string(),
            DictError::InvalidWord(reason) => format!("ข้อมูลไม่ถูกต้อง: {reason}"),
            DictError::MalformedFile { .. } => "ไฟล์ไม่ถูกต้อง กรุณาตรวจสอบรูปแบบ".to_string(),
            DictError::NoValidRows { .. } | DictError::EmptyInput => {
                "ไม่พบข้อมูลที่ถูกต้องในไฟล์".to_string()
            }
            DictError::UnsupportedFormat(ext) => format!("ไม่รองรับไฟล์ .{ext}"),
            DictError::Spreadsheet(_) => "เกิดข้อผิดพลาดในการอ่านไฟล์".to_string(),
            DictError::Database(_) | DictError::Io(_) => "เกิดข้อผิดพลาดในการเชื่อมต่อ".to_string(),
            DictError::Config(reason) => format!("การตั้งค่าไม่ถูกต้อง: {reason}"),
            DictError::EmptyWordList => "กรุณาเพิ่มคำศัพท์ก่อนเริ่มฝึก".to_string(),
            DictError::NoCurrentWord
            | DictError::InputLocked
            | DictError::InvalidChoice(_) => "ไม่สามารถทำรายการได้ในขณะนี้".to_string(),
        }
    }
}

/// A convenience `Result` type alias using the crate's `DictError` type.
pub type Result<T> = std::result::Result<T, DictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(DictError::NoValidRows { rejected: 2 }.kind(), ErrorKind::Validation);
        assert_eq!(DictError::Conflict("dup".into()).kind(), ErrorKind::Conflict);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "down");
        assert_eq!(DictError::from(io).kind(), ErrorKind::Connectivity);
        assert_eq!(DictError::InputLocked.kind(), ErrorKind::Engine);
    }

    #[test]
    fn conflict_message_is_verbatim() {
        let err = DictError::Conflict("คำว่า 'cat' มีอยู่แล้ว".into());
        assert_eq!(err.user_message(), "คำว่า 'cat' มีอยู่แล้ว");
        assert_eq!(err.to_string(), "คำว่า 'cat' มีอยู่แล้ว");
    }

    #[test]
    fn bulk_conflict_lists_words() {
        let err = DictError::BulkConflict {
            conflicts: vec![
                RowConflict {
                    index: 0,
                    english: "cat".into(),
                    reason: ConflictReason::AlreadyStored,
                },
                RowConflict {
                    index: 3,
                    english: "dog".into(),
                    reason: ConflictReason::DuplicateInBatch,
                },
            ],
        };
        assert!(err.to_string().contains("2 conflicting"));
        let message = err.user_message();
        assert!(message.contains("มีอยู่แล้ว: cat"));
        assert!(message.contains("ซ้ำในไฟล์: dog"));
    }

    #[test]
    fn bulk_conflict_names_invalid_rows_by_position() {
        let err = DictError::BulkConflict {
            conflicts: vec![RowConflict {
                index: 4,
                english: String::new(),
                reason: ConflictReason::Invalid,
            }],
        };
        let message = err.user_message();
        assert!(message.contains("ข้อมูลไม่ครบ: แถวที่ 5"));
        assert!(!message.contains("ซ้ำ"));
    }
}
