//! Real time sources backed by the operating system.

use crate::clock::Clock;
use crate::duration_to_ms;
use crate::error::{ClockError, ClockResult};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Wall clock: milliseconds since the Unix epoch.
///
/// Readings can jump backwards if the system time is adjusted. That is an
/// accepted property of wall time and is not corrected for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new wall clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> ClockResult {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClockError::BeforeEpoch {
                behind_ms: duration_to_ms(e.duration()),
            })?;
        u64::try_from(since_epoch.as_millis())
            .ok()
            .ok_or(ClockError::Overflow)
    }

    fn idle_until(&self, deadline_ms: u64) -> ClockResult<()> {
        sleep_remaining(self.now_ms()?, deadline_ms);
        Ok(())
    }
}

/// Monotonic clock: milliseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a monotonic clock whose zero is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// The instant this clock counts from.
    #[inline]
    pub fn origin(&self) -> Instant {
        self.origin
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> ClockResult {
        u64::try_from(self.origin.elapsed().as_millis())
            .ok()
            .ok_or(ClockError::Overflow)
    }

    fn idle_until(&self, deadline_ms: u64) -> ClockResult<()> {
        sleep_remaining(self.now_ms()?, deadline_ms);
        Ok(())
    }
}

fn sleep_remaining(now_ms: u64, deadline_ms: u64) {
    if deadline_ms > now_ms {
        std::thread::sleep(Duration::from_millis(deadline_ms.saturating_sub(now_ms)));
    }
}
