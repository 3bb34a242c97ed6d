//! Shuffled working set shared by the practice and quiz engines.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{DictError, Result};
use crate::word::WordRecord;

/// Uniformly random permutation of `items` (Fisher-Yates).
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// One round's worth of words. The head is the current word.
///
/// The order is fixed when the round starts; `advance` only ever pops, so
/// each word is seen exactly once per round.
#[derive(Debug, Clone, Default)]
pub struct SessionQueue {
    working_set: VecDeque<WordRecord>,
}

impl SessionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working set with a fresh shuffle of `words`.
    pub fn start<R: Rng + ?Sized>(&mut self, words: &[WordRecord], rng: &mut R) -> Result<()> {
        if words.is_empty() {
            return Err(DictError::EmptyWordList);
        }
        self.working_set = shuffled(words, rng).into();
        debug!(words = self.working_set.len(), "round started");
        Ok(())
    }

    pub fn current(&self) -> Option<&WordRecord> {
        self.working_set.front()
    }

    /// Drop the head and return it. Does nothing on an empty queue.
    pub fn advance(&mut self) -> Option<WordRecord> {
        let done = self.working_set.pop_front();
        if done.is_some() {
            debug!(remaining = self.working_set.len(), "queue advanced");
        }
        done
    }

    pub fn remaining_count(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    /// Forget the current round, e.g. because the word list changed.
    pub fn clear(&mut self) {
        self.working_set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn words(n: usize) -> Vec<WordRecord> {
        (0..n)
            .map(|i| WordRecord::new(&format!("word{i}"), &format!("คำ{i}"), None))
            .collect()
    }

    #[test]
    fn start_rejects_empty_list() {
        let mut queue = SessionQueue::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            queue.start(&[], &mut rng),
            Err(DictError::EmptyWordList)
        ));
        assert!(queue.current().is_none());
    }

    #[test]
    fn round_visits_every_word_once() {
        let list = words(12);
        let mut queue = SessionQueue::new();
        let mut rng = StdRng::seed_from_u64(7);
        queue.start(&list, &mut rng).unwrap();

        let mut seen = HashSet::new();
        let mut expected_remaining = list.len();
        while let Some(word) = queue.current().cloned() {
            assert_eq!(queue.remaining_count(), expected_remaining);
            assert!(seen.insert(word.english.clone()), "word repeated in round");
            assert_eq!(queue.advance(), Some(word));
            expected_remaining -= 1;
            assert_eq!(queue.remaining_count(), expected_remaining);
        }
        assert_eq!(seen.len(), list.len());
    }

    #[test]
    fn advance_on_empty_is_noop() {
        let mut queue = SessionQueue::new();
        assert_eq!(queue.advance(), None);
        assert_eq!(queue.remaining_count(), 0);
    }

    #[test]
    fn first_position_is_roughly_uniform() {
        let list = words(4);
        let mut rng = StdRng::seed_from_u64(42);
        let mut queue = SessionQueue::new();
        let mut counts = [0usize; 4];
        let trials = 8000;
        for _ in 0..trials {
            queue.start(&list, &mut rng).unwrap();
            let head = queue.current().unwrap();
            let idx = list.iter().position(|w| w == head).unwrap();
            counts[idx] += 1;
        }
        // Expected 2000 each; allow generous slack.
        for count in counts {
            assert!((1700..=2300).contains(&count), "skewed counts: {counts:?}");
        }
    }

    #[test]
    fn shuffled_keeps_all_items() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut out = shuffled(&[1, 2, 3, 4, 5], &mut rng);
        out.sort();
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
    }
}
