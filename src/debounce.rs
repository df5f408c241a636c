//! Quiet-period coalescing for bursty host events.
//!
//! DESIGN
//! ======
//! Window resizes arrive in bursts while the user drags the window edge.
//! Each trigger pushes the deadline out by the quiet period; the action runs
//! once, on the first poll at or after the deadline. Time is passed in by the
//! caller so the host's event loop owns the clock and tests stay exact.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, deadline: None }
    }

    #[must_use]
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Record an event at `now`, restarting the quiet period.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Whether an event is waiting for its quiet period to pass.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once per burst, when `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending event.
    pub fn reset(&mut self) {
        self.deadline = None;
    }
}
