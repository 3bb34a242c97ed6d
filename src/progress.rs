//! Progress tracking - per-round attempt log and statistics

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which drill produced an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillMode {
    Practice,
    Quiz,
}

/// One judged answer
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    pub english: String,
    pub mode: DrillMode,
    pub is_correct: bool,
    pub user_answer: String,
    pub expected_answer: String,
    pub attempted_at: DateTime<Utc>,
}

/// Attempt statistics for a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttemptStats {
    pub total_attempts: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub accuracy_percent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AttemptLog {
    attempts: Vec<Attempt>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        english: &str,
        mode: DrillMode,
        is_correct: bool,
        user_answer: &str,
        expected_answer: &str,
    ) {
        self.attempts.push(Attempt {
            english: english.to_string(),
            mode,
            is_correct,
            user_answer: user_answer.to_string(),
            expected_answer: expected_answer.to_string(),
            attempted_at: Utc::now(),
        });
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn clear(&mut self) {
        self.attempts.clear();
    }

    pub fn stats(&self) -> AttemptStats {
        let total = self.attempts.len();
        let correct = self.attempts.iter().filter(|a| a.is_correct).count();
        let accuracy = if total > 0 {
            (correct as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        AttemptStats {
            total_attempts: total,
            correct_count: correct,
            incorrect_count: total - correct,
            accuracy_percent: accuracy,
        }
    }

    /// Words answered incorrectly, most-missed first. Ties keep first-miss order.
    pub fn missed_words(&self) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for attempt in self.attempts.iter().filter(|a| !a.is_correct) {
            let count = counts.entry(attempt.english.as_str()).or_insert(0);
            if *count == 0 {
                order.push(attempt.english.clone());
            }
            *count += 1;
        }

        let mut missed: Vec<(String, usize)> = order
            .into_iter()
            .map(|english| {
                let count = counts[english.as_str()];
                (english, count)
            })
            .collect();
        missed.sort_by(|a, b| b.1.cmp(&a.1));
        missed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_on_empty_log() {
        let stats = AttemptLog::new().stats();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.accuracy_percent, 0.0);
    }

    #[test]
    fn stats_and_missed_words() {
        let mut log = AttemptLog::new();
        log.record("cat", DrillMode::Quiz, true, "แมว", "แมว");
        log.record("dog", DrillMode::Quiz, false, "แมว", "สุนัข");
        log.record("bird", DrillMode::Practice, false, "nok", "นก");
        log.record("bird", DrillMode::Practice, false, "no", "นก");

        let stats = log.stats();
        assert_eq!(stats.total_attempts, 4);
        assert_eq!(stats.correct_count, 1);
        assert_eq!(stats.incorrect_count, 3);
        assert_eq!(stats.accuracy_percent, 25.0);

        assert_eq!(
            log.missed_words(),
            vec![("bird".to_string(), 2), ("dog".to_string(), 1)]
        );
    }
}
