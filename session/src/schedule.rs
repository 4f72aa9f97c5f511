//! Pacing for the computer's reply.
//!
//! A reply is a single-shot [`PendingTurn`] stamped with the session
//! generation it was scheduled for. Any later mutation of the session moves
//! the generation on, so a turn that fires late is recognised as stale.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

/// Monotonic wall clock.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and give another to the session.
#[derive(Clone, Debug, Default)]
pub struct FakeClock {
    current: Rc<Cell<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, amount: Duration) {
        self.current.set(self.current.get() + amount);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.current.get()
    }
}

/// A computer reply waiting for its delay to pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PendingTurn {
    /// Session generation the reply was scheduled against.
    pub generation: u64,
    /// Clock reading at which the reply may be played.
    pub due: Duration,
}

impl PendingTurn {
    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.due
    }

    /// How long until the reply may be played; zero once it is due.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.due.saturating_sub(now)
    }
}
