//! Multiple-choice question generation for the quiz

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::word::WordRecord;

/// Choices per question: one correct translation plus three distractors.
pub const CHOICE_COUNT: usize = 4;

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: usize,
    pub text: String,
    pub is_correct: bool,
}

/// A word under test with its shuffled options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub word: WordRecord,
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn prompt(&self) -> String {
        format!("\"{}\" แปลว่าอะไร?", self.word.english)
    }

    pub fn correct_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|c| c.is_correct)
    }

    pub fn choice(&self, id: usize) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// Translations of up to `count` other words, sampled without replacement.
///
/// Words sharing the target's `english` key are never picked. With a small
/// pool the result is simply shorter.
pub fn pick_distractors<R: Rng + ?Sized>(
    target: &WordRecord,
    pool: &[WordRecord],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let others: Vec<&WordRecord> = pool
        .iter()
        .filter(|w| w.english != target.english)
        .collect();

    others
        .choose_multiple(rng, count)
        .map(|w| w.thai.clone())
        .collect()
}

/// Build a question for `target` with up to `choice_count` options.
///
/// Exactly one option is tagged correct, even if a distractor happens to
/// share its text.
pub fn build_question<R: Rng + ?Sized>(
    target: &WordRecord,
    pool: &[WordRecord],
    choice_count: usize,
    rng: &mut R,
) -> Question {
    let distractors = pick_distractors(target, pool, choice_count.saturating_sub(1), rng);

    // Build options list with correct answer in random position
    let correct_index = rng.gen_range(0..=distractors.len());
    let mut texts = distractors;
    texts.insert(correct_index, target.thai.clone());

    let choices = texts
        .into_iter()
        .enumerate()
        .map(|(id, text)| Choice {
            id,
            text,
            is_correct: id == correct_index,
        })
        .collect();

    Question {
        word: target.clone(),
        choices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> Vec<WordRecord> {
        [
            ("cat", "แมว"),
            ("dog", "สุนัข"),
            ("bird", "นก"),
            ("fish", "ปลา"),
            ("cow", "วัว"),
            ("duck", "เป็ด"),
        ]
        .iter()
        .map(|(en, th)| WordRecord::new(en, th, None))
        .collect()
    }

    #[test]
    fn choices_are_well_formed() {
        let words = pool();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            for target in &words {
                let question = build_question(target, &words, CHOICE_COUNT, &mut rng);
                assert_eq!(question.choices.len(), 4);
                let correct: Vec<_> = question.choices.iter().filter(|c| c.is_correct).collect();
                assert_eq!(correct.len(), 1);
                assert_eq!(correct[0].text, target.thai);

                let mut texts: Vec<_> = question.choices.iter().map(|c| &c.text).collect();
                texts.sort();
                texts.dedup();
                assert_eq!(texts.len(), 4, "distractor repeated or equals answer");
            }
        }
    }

    #[test]
    fn correct_position_varies() {
        let words = pool();
        let mut rng = StdRng::seed_from_u64(5);
        let mut positions = [0usize; 4];
        for _ in 0..400 {
            let question = build_question(&words[0], &words, CHOICE_COUNT, &mut rng);
            positions[question.correct_choice().unwrap().id] += 1;
        }
        assert!(positions.iter().all(|&n| n > 50), "{positions:?}");
    }

    #[test]
    fn small_pool_yields_fewer_choices() {
        let words = &pool()[..2];
        let mut rng = StdRng::seed_from_u64(1);
        let question = build_question(&words[0], words, CHOICE_COUNT, &mut rng);
        assert_eq!(question.choices.len(), 2);
        assert_eq!(question.correct_choice().unwrap().text, "แมว");

        let alone = build_question(&words[0], &words[..1], CHOICE_COUNT, &mut rng);
        assert_eq!(alone.choices.len(), 1);
        assert!(alone.choices[0].is_correct);
    }

    #[test]
    fn shared_translation_still_has_one_correct() {
        let words = vec![
            WordRecord::new("big", "ใหญ่", None),
            WordRecord::new("large", "ใหญ่", None),
        ];
        let mut rng = StdRng::seed_from_u64(2);
        let question = build_question(&words[0], &words, CHOICE_COUNT, &mut rng);
        assert_eq!(question.choices.iter().filter(|c| c.is_correct).count(), 1);
    }
}
