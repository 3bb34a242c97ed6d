//! Multiple-choice quiz over the word list.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{DictError, Result};
use crate::progress::{AttemptLog, AttemptStats, DrillMode};
use crate::questions::{build_question, Question, CHOICE_COUNT};
use crate::queue::SessionQueue;
use crate::timer::{AutoAdvance, FEEDBACK_DELAY};
use crate::word::WordRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerResult {
    Correct,
    Incorrect,
    /// Feedback was already showing; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizFeedback {
    pub chosen: usize,
    pub is_correct: bool,
    pub correct_answer: String,
}

impl QuizFeedback {
    pub fn message(&self) -> String {
        if self.is_correct {
            "ถูกต้อง! 🎉".to_string()
        } else {
            format!("ไม่ถูกต้อง คำตอบที่ถูกต้องคือ: {}", self.correct_answer)
        }
    }
}

/// How a choice should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceStyle {
    /// No feedback yet; every choice is selectable.
    Neutral,
    /// The right answer, highlighted whatever was picked.
    Correct,
    /// The user's wrong pick.
    Wrong,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Question,
    ShowingFeedback,
    /// Round finished (or not yet restarted); words are available.
    Completed,
    /// No words at all.
    Empty,
}

/// One quiz screen's session.
pub struct QuizEngine<R = StdRng> {
    words: Vec<WordRecord>,
    queue: SessionQueue,
    question: Option<Question>,
    feedback: Option<QuizFeedback>,
    score: usize,
    answered: usize,
    choice_count: usize,
    auto_advance: AutoAdvance,
    log: AttemptLog,
    rng: R,
}

impl QuizEngine<StdRng> {
    pub fn new(words: Vec<WordRecord>) -> Self {
        Self::with_rng(words, FEEDBACK_DELAY, StdRng::from_entropy())
    }

    pub fn from_config(words: Vec<WordRecord>, config: &Config) -> Self {
        Self::build(
            words,
            config.feedback_delay(),
            config.choice_count,
            StdRng::from_entropy(),
        )
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(words: Vec<WordRecord>, delay: Duration, rng: R) -> Self {
        Self::build(words, delay, CHOICE_COUNT, rng)
    }

    fn build(words: Vec<WordRecord>, delay: Duration, choice_count: usize, rng: R) -> Self {
        let mut engine = Self {
            words,
            queue: SessionQueue::new(),
            question: None,
            feedback: None,
            score: 0,
            answered: 0,
            choice_count: choice_count.max(1),
            auto_advance: AutoAdvance::new(delay),
            log: AttemptLog::new(),
            rng,
        };
        engine.reset();
        engine
    }

    pub fn state(&self) -> QuizState {
        if self.feedback.is_some() {
            QuizState::ShowingFeedback
        } else if self.question.is_some() {
            QuizState::Question
        } else if self.words.is_empty() {
            QuizState::Empty
        } else {
            QuizState::Completed
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn feedback(&self) -> Option<&QuizFeedback> {
        self.feedback.as_ref()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered_count(&self) -> usize {
        self.answered
    }

    /// Questions left in the round, the one on screen included.
    pub fn remaining_count(&self) -> usize {
        self.queue.remaining_count()
    }

    pub fn stats(&self) -> AttemptStats {
        self.log.stats()
    }

    pub fn log(&self) -> &AttemptLog {
        &self.log
    }

    /// Build the question for the word at the head of the queue.
    ///
    /// While feedback is showing the question on screen is kept as is.
    pub fn generate_question(&mut self) -> Option<&Question> {
        if self.feedback.is_some() {
            return self.question.as_ref();
        }
        let word = self.queue.current()?.clone();
        let question = build_question(&word, &self.words, self.choice_count, &mut self.rng);
        debug!(english = %word.english, choices = question.choices.len(), "question generated");
        self.question = Some(question);
        self.question.as_ref()
    }

    /// Pick a choice. A second pick while feedback is showing is ignored.
    pub fn answer(&mut self, choice_id: usize, now: Instant) -> Result<AnswerResult> {
        if self.feedback.is_some() {
            return Ok(AnswerResult::Ignored);
        }
        let question = self.question.as_ref().ok_or(DictError::NoCurrentWord)?;
        let choice = question
            .choice(choice_id)
            .ok_or(DictError::InvalidChoice(choice_id))?;

        let is_correct = choice.is_correct;
        self.log.record(
            &question.word.english,
            DrillMode::Quiz,
            is_correct,
            &choice.text,
            &question.word.thai,
        );
        let feedback = QuizFeedback {
            chosen: choice_id,
            is_correct,
            correct_answer: question.word.thai.clone(),
        };

        self.answered += 1;
        if is_correct {
            self.score += 1;
        }
        debug!(score = self.score, answered = self.answered, "quiz answer judged");
        self.feedback = Some(feedback);
        self.auto_advance.schedule(now);

        Ok(if is_correct {
            AnswerResult::Correct
        } else {
            AnswerResult::Incorrect
        })
    }

    /// Time left before the feedback clears and the next question shows.
    pub fn advance_remaining(&self, now: Instant) -> Option<Duration> {
        self.auto_advance.remaining(now)
    }

    /// Fire a due auto-advance. Returns `true` if the quiz moved on.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.auto_advance.fire_if_due(now) {
            return false;
        }
        self.feedback = None;
        self.question = None;
        self.queue.advance();
        if self.generate_question().is_none() {
            debug!(score = self.score, answered = self.answered, "quiz round complete");
        }
        true
    }

    pub fn choice_style(&self, choice_id: usize) -> ChoiceStyle {
        let (Some(feedback), Some(question)) = (&self.feedback, &self.question) else {
            return ChoiceStyle::Neutral;
        };
        let Some(choice) = question.choice(choice_id) else {
            return ChoiceStyle::Muted;
        };
        if choice.is_correct {
            ChoiceStyle::Correct
        } else if choice.id == feedback.chosen {
            ChoiceStyle::Wrong
        } else {
            ChoiceStyle::Muted
        }
    }

    /// Zero the score and reshuffle the full list into a new round.
    pub fn restart(&mut self) -> Result<()> {
        self.auto_advance.cancel();
        self.feedback = None;
        self.question = None;
        self.score = 0;
        self.answered = 0;
        self.log.clear();
        self.queue.clear();
        self.queue.start(&self.words, &mut self.rng)?;
        self.generate_question();
        Ok(())
    }

    /// The word list changed underneath the session.
    pub fn replace_words(&mut self, words: Vec<WordRecord>) {
        self.words = words;
        self.reset();
    }

    fn reset(&mut self) {
        if self.restart().is_err() {
            debug!("quiz has no words");
        }
    }
}
