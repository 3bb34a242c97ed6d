//! Word records and the small value types that travel with them.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DictError, Result};

/// Shown in place of an absent category.
pub const CATEGORY_PLACEHOLDER: &str = "-";

/// English/Thai word pair
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub english: String,
    pub thai: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl WordRecord {
    /// Build a record, trimming every field and mapping a blank category to `None`.
    pub fn new(english: &str, thai: &str, category: Option<&str>) -> Self {
        Self {
            english: english.trim().to_string(),
            thai: thai.trim().to_string(),
            category: category
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }

    /// Reject records whose required fields are blank.
    pub fn validate(&self) -> Result<()> {
        if self.english.trim().is_empty() {
            return Err(DictError::InvalidWord("english is empty".into()));
        }
        if self.thai.trim().is_empty() {
            return Err(DictError::InvalidWord("thai is empty".into()));
        }
        Ok(())
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(CATEGORY_PLACEHOLDER)
    }
}

/// Category with the number of words filed under it
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    /// `None` groups the uncategorised words.
    pub name: Option<String>,
    pub word_count: i64,
}

/// Field a word list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    English,
    Thai,
    Category,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortField::English => "english",
            SortField::Thai => "thai",
            SortField::Category => "category",
        };
        f.write_str(name)
    }
}

impl FromStr for SortField {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "english" | "word" => Ok(SortField::English),
            "thai" | "translation" => Ok(SortField::Thai),
            "category" => Ok(SortField::Category),
            other => Err(DictError::InvalidWord(format!("unknown sort field: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_drops_blank_category() {
        let word = WordRecord::new("  cat ", " แมว", Some("   "));
        assert_eq!(word.english, "cat");
        assert_eq!(word.thai, "แมว");
        assert_eq!(word.category, None);
        assert_eq!(word.category_label(), "-");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(WordRecord::new("cat", "แมว", None).validate().is_ok());
        assert!(WordRecord::new("", "แมว", None).validate().is_err());
        assert!(WordRecord::new("cat", "  ", None).validate().is_err());
    }

    #[test]
    fn deserializes_missing_category_as_none() {
        let word: WordRecord = serde_json::from_str(r#"{"english":"dog","thai":"สุนัข"}"#).unwrap();
        assert_eq!(word.category, None);
    }

    #[test]
    fn sort_field_parses() {
        assert_eq!("English".parse::<SortField>().unwrap(), SortField::English);
        assert_eq!("category".parse::<SortField>().unwrap(), SortField::Category);
        assert!("colour".parse::<SortField>().is_err());
    }
}
