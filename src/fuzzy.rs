//! Answer comparison for free-recall drills

use strsim::{jaro_winkler, levenshtein, normalized_levenshtein};

/// Similarity at which a wrong answer counts as "almost".
pub const NEAR_MISS_THRESHOLD: f64 = 0.8;

/// Trim surrounding whitespace and case-fold.
///
/// Internal whitespace and diacritics are left alone.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Result of checking a typed answer against the expected one
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    /// 1.0 for a match, otherwise a blend of Levenshtein and Jaro-Winkler.
    pub similarity: f64,
    /// Edit distance between the normalized strings.
    pub distance: usize,
}

impl AnswerCheck {
    pub fn is_near_miss(&self, threshold: f64) -> bool {
        !self.is_correct && self.similarity >= threshold
    }
}

/// Exact comparison after [`normalize`]; similarity is informational only.
pub fn check_answer(user_input: &str, expected: &str) -> AnswerCheck {
    let input_normalized = normalize(user_input);
    let expected_normalized = normalize(expected);

    if input_normalized == expected_normalized {
        return AnswerCheck {
            is_correct: true,
            similarity: 1.0,
            distance: 0,
        };
    }

    let levenshtein_sim = normalized_levenshtein(&input_normalized, &expected_normalized);
    let jaro_sim = jaro_winkler(&input_normalized, &expected_normalized);

    AnswerCheck {
        is_correct: false,
        // Jaro-Winkler is kinder to typos, so it gets the larger weight
        similarity: levenshtein_sim * 0.4 + jaro_sim * 0.6,
        distance: levenshtein(&input_normalized, &expected_normalized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_folds_case() {
        assert!(check_answer(" Cat ", "Cat").is_correct);
        assert!(check_answer("cat", "Cat").is_correct);
        assert!(check_answer("แมว", " แมว ").is_correct);
    }

    #[test]
    fn diacritics_and_inner_spaces_matter() {
        assert!(!check_answer("Cät", "Cat").is_correct);
        assert!(!check_answer("ice  cream", "ice cream").is_correct);
    }

    #[test]
    fn near_miss_reports_distance() {
        let check = check_answer("elephnat", "elephant");
        assert!(!check.is_correct);
        assert_eq!(check.distance, 2);
        assert!(check.is_near_miss(NEAR_MISS_THRESHOLD));

        let far = check_answer("dog", "elephant");
        assert!(!far.is_near_miss(NEAR_MISS_THRESHOLD));
    }
}
