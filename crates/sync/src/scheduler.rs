//! Flush timing policy: coalesce edits, flush after a quiet period or a
//! hard deadline, whichever comes first.

use std::time::{Duration, Instant};

/// Quiet period after the last edit before a flush.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Hard ceiling from the first edit of a burst, never pushed back.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(1500);

/// Debounce/max-wait flush scheduler.
///
/// Two deadlines: the debounce deadline re-arms on every change, the
/// max-wait deadline arms on the first change of a burst and then stays
/// put, so a stream of rapid edits cannot starve the flush forever.
///
/// The scheduler owns no timers. The host calls [`note_change`] on every
/// committed edit and polls [`due`] (or sleeps until [`next_due`]); when a
/// flush runs, [`disarm`] resets the burst.
///
/// [`note_change`]: FlushScheduler::note_change
/// [`due`]: FlushScheduler::due
/// [`next_due`]: FlushScheduler::next_due
/// [`disarm`]: FlushScheduler::disarm
#[derive(Debug, Clone)]
pub struct FlushScheduler {
    debounce: Duration,
    max_wait: Duration,
    debounce_due: Option<Instant>,
    max_due: Option<Instant>,
}

impl FlushScheduler {
    pub fn new(debounce: Duration, max_wait: Duration) -> Self {
        FlushScheduler {
            debounce,
            max_wait,
            debounce_due: None,
            max_due: None,
        }
    }

    /// Record a committed edit at `now`.
    pub fn note_change(&mut self, now: Instant) {
        self.debounce_due = Some(now + self.debounce);
        if self.max_due.is_none() {
            self.max_due = Some(now + self.max_wait);
        }
    }

    /// Whether either deadline has passed.
    pub fn due(&self, now: Instant) -> bool {
        self.debounce_due.is_some_and(|t| now >= t) || self.max_due.is_some_and(|t| now >= t)
    }

    /// Earliest pending deadline, for hosts that sleep instead of polling.
    pub fn next_due(&self) -> Option<Instant> {
        match (self.debounce_due, self.max_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.debounce_due.is_some()
    }

    /// Clear both deadlines. Called when a flush drains the buffer, and on
    /// teardown — pending deadlines die with the view, in-flight requests
    /// do not.
    pub fn disarm(&mut self) {
        self.debounce_due = None;
        self.max_due = None;
    }
}

impl Default for FlushScheduler {
    fn default() -> Self {
        FlushScheduler::new(DEFAULT_DEBOUNCE, DEFAULT_MAX_WAIT)
    }
}
