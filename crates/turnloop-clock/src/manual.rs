//! Simulated clock for deterministic tests.

use crate::clock::Clock;
use crate::error::ClockResult;
use std::cell::Cell;

/// A clock that only moves when told to.
///
/// Every call to [`Clock::now_ms`] returns the current reading and then
/// advances it by `step_ms`, so a busy-wait polling this clock makes progress
/// without any real time passing. [`Clock::idle_until`] jumps straight to the
/// deadline.
///
/// Interior mutability is a `Cell`, so the clock is `!Sync` and belongs to a
/// single thread, like the loop it drives.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
    step_ms: u64,
    samples: Cell<u64>,
}

impl ManualClock {
    /// Create a frozen clock reading `start_ms`.
    ///
    /// A busy-wait with a non-zero duration never finishes on a frozen
    /// clock; use [`ManualClock::ticking`] for that.
    pub fn new(start_ms: u64) -> Self {
        Self::ticking(start_ms, 0)
    }

    /// Create a clock that advances by `step_ms` after every sample.
    pub fn ticking(start_ms: u64, step_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
            step_ms,
            samples: Cell::new(0),
        }
    }

    /// Current reading without counting as a sample or advancing.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.now_ms.get()
    }

    /// Move the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(delta_ms));
    }

    /// Set the reading to an arbitrary value, including one in the past.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }

    /// Per-sample step in milliseconds.
    #[inline]
    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// Number of times [`Clock::now_ms`] has been called.
    #[inline]
    pub fn samples(&self) -> u64 {
        self.samples.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> ClockResult {
        let now = self.now_ms.get();
        self.samples.set(self.samples.get().saturating_add(1));
        self.advance(self.step_ms);
        Ok(now)
    }

    fn idle_until(&self, deadline_ms: u64) -> ClockResult<()> {
        if deadline_ms > self.now_ms.get() {
            self.now_ms.set(deadline_ms);
        }
        Ok(())
    }
}
