//! Runtime configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DictError, Result};
use crate::fuzzy::NEAR_MISS_THRESHOLD;
use crate::questions::CHOICE_COUNT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file backing the word store.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Delay before a judged answer moves on.
    #[serde(default = "default_feedback_delay")]
    pub feedback_delay_ms: u64,
    /// Options per quiz question, the correct one included.
    #[serde(default = "default_choice_count")]
    pub choice_count: usize,
    /// Similarity at which a wrong practice answer is called "almost".
    #[serde(default = "default_near_miss_threshold")]
    pub near_miss_threshold: f64,
    /// Rows shown in an import preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("dictbuddy.db")
}
fn default_feedback_delay() -> u64 {
    1500
}
fn default_choice_count() -> usize {
    CHOICE_COUNT
}
fn default_near_miss_threshold() -> f64 {
    NEAR_MISS_THRESHOLD
}
fn default_preview_rows() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            feedback_delay_ms: default_feedback_delay(),
            choice_count: default_choice_count(),
            near_miss_threshold: default_near_miss_threshold(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl Config {
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| DictError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.choice_count == 0 {
            return Err(DictError::Config("choice_count must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.near_miss_threshold) {
            return Err(DictError::Config(
                "near_miss_threshold must be between 0.0 and 1.0".into(),
            ));
        }
        Ok(())
    }
}
