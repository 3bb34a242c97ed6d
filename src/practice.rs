//! Free-recall practice: type the translation of the word on screen.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{DictError, Result};
use crate::fuzzy::{check_answer, AnswerCheck, NEAR_MISS_THRESHOLD};
use crate::progress::{AttemptLog, AttemptStats, DrillMode};
use crate::queue::SessionQueue;
use crate::timer::{AutoAdvance, FEEDBACK_DELAY};
use crate::word::WordRecord;

/// Which side of the pair is shown and which is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    EnToTh,
    ThToEn,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::EnToTh => Direction::ThToEn,
            Direction::ThToEn => Direction::EnToTh,
        }
    }

    pub fn prompt(self, word: &WordRecord) -> &str {
        match self {
            Direction::EnToTh => &word.english,
            Direction::ThToEn => &word.thai,
        }
    }

    pub fn expected(self, word: &WordRecord) -> &str {
        match self {
            Direction::EnToTh => &word.thai,
            Direction::ThToEn => &word.english,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::EnToTh => "อังกฤษ → ไทย",
            Direction::ThToEn => "ไทย → อังกฤษ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Feedback on the last submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub outcome: Outcome,
    /// The expected answer, verbatim as stored.
    pub revealed_answer: String,
    pub check: AnswerCheck,
    pub near_miss: bool,
}

impl Feedback {
    pub fn message(&self) -> String {
        match self.outcome {
            Outcome::Correct => "ถูกต้อง! 🎉".to_string(),
            Outcome::Incorrect if self.near_miss => format!(
                "เกือบถูก! ผิดไป {} ตัวอักษร คำตอบที่ถูกต้องคือ: {}",
                self.check.distance, self.revealed_answer
            ),
            Outcome::Incorrect => format!("คำตอบที่ถูกต้องคือ: {}", self.revealed_answer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeState {
    AwaitingAnswer,
    /// Correct answer on screen; the queue moves on once the delay passes.
    AutoAdvancing,
    /// Wrong answer on screen; waits for the user to skip.
    ShowingAnswer,
    /// Queue exhausted or no words at all.
    Finished,
}

/// One practice screen's session.
pub struct PracticeEngine<R = StdRng> {
    words: Vec<WordRecord>,
    queue: SessionQueue,
    direction: Direction,
    feedback: Option<Feedback>,
    draft: String,
    auto_advance: AutoAdvance,
    near_miss_threshold: f64,
    log: AttemptLog,
    rng: R,
}

impl PracticeEngine<StdRng> {
    pub fn new(words: Vec<WordRecord>) -> Self {
        Self::with_rng(words, FEEDBACK_DELAY, StdRng::from_entropy())
    }

    pub fn from_config(words: Vec<WordRecord>, config: &Config) -> Self {
        Self::with_rng(words, config.feedback_delay(), StdRng::from_entropy())
            .with_near_miss_threshold(config.near_miss_threshold)
    }
}

impl<R: Rng> PracticeEngine<R> {
    /// Build an engine with an explicit random source and starts the first round.
    pub fn with_rng(words: Vec<WordRecord>, delay: Duration, rng: R) -> Self {
        let mut engine = Self {
            words,
            queue: SessionQueue::new(),
            direction: Direction::default(),
            feedback: None,
            draft: String::new(),
            auto_advance: AutoAdvance::new(delay),
            near_miss_threshold: NEAR_MISS_THRESHOLD,
            log: AttemptLog::new(),
            rng,
        };
        engine.reset();
        engine
    }

    pub fn with_near_miss_threshold(mut self, threshold: f64) -> Self {
        self.near_miss_threshold = threshold;
        self
    }

    pub fn state(&self) -> PracticeState {
        match &self.feedback {
            Some(f) if f.outcome == Outcome::Correct => PracticeState::AutoAdvancing,
            Some(_) => PracticeState::ShowingAnswer,
            None if self.queue.is_empty() => PracticeState::Finished,
            None => PracticeState::AwaitingAnswer,
        }
    }

    pub fn current(&self) -> Option<&WordRecord> {
        self.queue.current()
    }

    /// Text the user is asked to translate.
    pub fn prompt(&self) -> Option<&str> {
        self.queue.current().map(|w| self.direction.prompt(w))
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn input_enabled(&self) -> bool {
        self.state() == PracticeState::AwaitingAnswer
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Update the answer field. Ignored while input is disabled.
    pub fn set_draft(&mut self, text: &str) -> bool {
        if !self.input_enabled() {
            return false;
        }
        self.draft = text.to_string();
        true
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.remaining_count()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn stats(&self) -> AttemptStats {
        self.log.stats()
    }

    pub fn log(&self) -> &AttemptLog {
        &self.log
    }

    /// Time left before a correct answer moves on.
    pub fn advance_remaining(&self, now: Instant) -> Option<Duration> {
        self.auto_advance.remaining(now)
    }

    /// Judge `raw_input` against the current word.
    pub fn submit_answer(&mut self, raw_input: &str, now: Instant) -> Result<Outcome> {
        if self.feedback.is_some() {
            return Err(DictError::InputLocked);
        }
        let word = self.queue.current().ok_or(DictError::NoCurrentWord)?;
        let expected = self.direction.expected(word).to_string();
        let english = word.english.clone();

        let check = check_answer(raw_input, &expected);
        self.log.record(
            &english,
            DrillMode::Practice,
            check.is_correct,
            raw_input,
            &expected,
        );

        let outcome = if check.is_correct {
            self.auto_advance.schedule(now);
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        debug!(%english, ?outcome, "practice answer judged");

        self.draft = raw_input.to_string();
        self.feedback = Some(Feedback {
            outcome,
            revealed_answer: expected,
            near_miss: check.is_near_miss(self.near_miss_threshold),
            check,
        });
        Ok(outcome)
    }

    /// Submit whatever is in the answer field.
    pub fn submit(&mut self, now: Instant) -> Result<Outcome> {
        let draft = self.draft.clone();
        self.submit_answer(&draft, now)
    }

    /// Move past the current word without waiting.
    pub fn skip(&mut self) -> Result<()> {
        match self.state() {
            PracticeState::AutoAdvancing => Err(DictError::InputLocked),
            PracticeState::Finished => Err(DictError::NoCurrentWord),
            PracticeState::AwaitingAnswer | PracticeState::ShowingAnswer => {
                self.advance_word();
                Ok(())
            }
        }
    }

    /// Fire a due auto-advance. Returns `true` if the queue moved.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.auto_advance.fire_if_due(now) {
            self.advance_word();
            return true;
        }
        false
    }

    /// Flip the drill direction. The current word stays, feedback is dropped.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        self.auto_advance.cancel();
        self.feedback = None;
        self.draft.clear();
        debug!(direction = self.direction.label(), "practice direction toggled");
    }

    /// Reshuffle the full list into a new round.
    pub fn start_round(&mut self) -> Result<()> {
        self.auto_advance.cancel();
        self.feedback = None;
        self.draft.clear();
        self.log.clear();
        self.queue.clear();
        self.queue.start(&self.words, &mut self.rng)
    }

    /// The word list changed underneath the session.
    pub fn replace_words(&mut self, words: Vec<WordRecord>) {
        self.words = words;
        self.reset();
    }

    fn reset(&mut self) {
        if self.start_round().is_err() {
            debug!("practice has no words to drill");
        }
    }

    fn advance_word(&mut self) {
        self.auto_advance.cancel();
        self.feedback = None;
        self.draft.clear();
        self.queue.advance();
        if self.queue.is_empty() {
            debug!("practice round complete");
        }
    }
}
