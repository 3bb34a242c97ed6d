//! Delayed transitions driven by the caller's clock.
//!
//! Engines never sleep. A correct answer arms an [`AutoAdvance`]; the owner
//! calls the engine's `poll(now)` and the transition fires once the deadline
//! has passed. Cancelling (or dropping the engine) discards it, so a stale
//! deadline can never touch a session that was reset in the meantime.

use std::time::{Duration, Instant};

use tracing::debug;

/// Default delay before a judged answer moves on.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    delay: Duration,
    due: Option<Instant>,
}

impl AutoAdvance {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer relative to `now`, replacing any earlier deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
        debug!(delay_ms = self.delay.as_millis() as u64, "auto-advance scheduled");
    }

    pub fn cancel(&mut self) {
        if self.due.take().is_some() {
            debug!("auto-advance cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Time left before the deadline, `None` when nothing is scheduled.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }

    /// Disarm and return `true` if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for AutoAdvance {
    fn default() -> Self {
        Self::new(FEEDBACK_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut timer = AutoAdvance::new(Duration::from_millis(100));
        timer.schedule(start);

        assert!(!timer.fire_if_due(start + Duration::from_millis(99)));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );
        assert!(timer.fire_if_due(start + Duration::from_millis(100)));
        assert!(!timer.is_pending());
        assert!(!timer.fire_if_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn cancel_discards_deadline() {
        let start = Instant::now();
        let mut timer = AutoAdvance::default();
        timer.schedule(start);
        timer.cancel();
        assert!(!timer.fire_if_due(start + Duration::from_secs(10)));
        assert_eq!(timer.remaining(start), None);
    }
}
