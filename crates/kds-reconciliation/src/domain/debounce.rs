//! # Debounce Timer
//!
//! A single schedulable flush deadline. Arming an armed timer moves the
//! deadline instead of adding a second one, so at most one flush is ever
//! pending.
//!
//! ```text
//!  enqueue      enqueue             enqueue
//!     │            │                   │
//!     ▼            ▼                   ▼
//! ────●────────────●───────────────────●──────────────[flush]
//!     └─ deadline ─┼─ moved ───────────┼─ moved ──────┘
//! ```

use shared_types::Timestamp;

/// Cancel-and-reschedule timer driven by an injected clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceTimer {
    delay_ms: u64,
    deadline: Option<Timestamp>,
}

impl DebounceTimer {
    /// Creates a disarmed timer
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Configured delay
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Arms the timer at `now + delay`, replacing any existing deadline
    ///
    /// Returns the new deadline.
    pub fn arm(&mut self, now: Timestamp) -> Timestamp {
        let deadline = now.saturating_add(self.delay_ms);
        self.deadline = Some(deadline);
        deadline
    }

    /// Disarms the timer
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// True when armed and the deadline has been reached
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Milliseconds left until the deadline; zero when overdue
    pub fn remaining_ms(&self, now: Timestamp) -> Option<u64> {
        self.deadline
            .map(|deadline| deadline.saturating_sub(now))
    }
}
