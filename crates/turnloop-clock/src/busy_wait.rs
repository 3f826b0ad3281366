//! CPU-bound blocking by polling a clock.
//!
//! The loop here never sleeps and never hands control to a scheduler. On a
//! single-threaded event loop that means nothing else, queued timers
//! included, can run until it returns.

use crate::clock::Clock;
use crate::duration_to_ms;
use crate::error::ClockResult;
use core::time::Duration;
use tracing::trace;

/// Record of one completed busy-wait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyWait {
    /// First clock sample, taken before the deadline was computed
    pub started_ms: u64,
    /// `started_ms + duration`, saturating
    pub deadline_ms: u64,
    /// The sample that ended the loop (`>= deadline_ms`)
    pub finished_ms: u64,
    /// Clock samples taken inside the loop
    pub polls: u64,
}

impl BusyWait {
    /// Milliseconds between the first and the last sample.
    ///
    /// Saturates to zero if the clock went backwards.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.started_ms)
    }

    /// How far past the deadline the last sample landed.
    #[inline]
    pub fn overshoot_ms(&self) -> u64 {
        self.finished_ms.saturating_sub(self.deadline_ms)
    }
}

/// Block the calling thread until `clock` reads at least `now + duration`.
///
/// The deadline is computed once from the first sample and never changes.
/// The clock is then re-sampled in a tight loop until a sample is no longer
/// below the deadline. `std::hint::spin_loop` between polls is a processor
/// hint only; the thread is never yielded.
///
/// A zero duration returns after the first poll.
///
/// # Errors
///
/// Returns the clock's error if any sample fails.
pub fn busy_wait<C: Clock + ?Sized>(clock: &C, duration: Duration) -> ClockResult<BusyWait> {
    let started_ms = clock.now_ms()?;
    let deadline_ms = started_ms.saturating_add(duration_to_ms(duration));
    trace!(started_ms, deadline_ms, "busy-wait started");

    let mut polls: u64 = 0;
    let finished_ms = loop {
        let now = clock.now_ms()?;
        polls = polls.saturating_add(1);
        if now >= deadline_ms {
            break now;
        }
        std::hint::spin_loop();
    };

    trace!(finished_ms, polls, "busy-wait finished");
    Ok(BusyWait {
        started_ms,
        deadline_ms,
        finished_ms,
        polls,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    #[test]
    fn test_zero_duration_polls_once() -> ClockResult<()> {
        let clock = ManualClock::new(500);
        let wait = busy_wait(&clock, Duration::ZERO)?;

        assert_eq!(wait.polls, 1);
        assert_eq!(wait.deadline_ms, 500);
        assert_eq!(wait.finished_ms, 500);
        assert_eq!(clock.samples(), 2);
        Ok(())
    }

    #[test]
    fn test_polls_until_deadline() -> ClockResult<()> {
        let clock = ManualClock::ticking(0, 10);
        let wait = busy_wait(&clock, Duration::from_millis(100))?;

        // started at 0, loop samples 10, 20, ..., 100
        assert_eq!(wait.started_ms, 0);
        assert_eq!(wait.deadline_ms, 100);
        assert_eq!(wait.finished_ms, 100);
        assert_eq!(wait.polls, 10);
        assert_eq!(wait.elapsed_ms(), 100);
        assert_eq!(wait.overshoot_ms(), 0);
        Ok(())
    }

    #[test]
    fn test_coarse_clock_overshoots() -> ClockResult<()> {
        let clock = ManualClock::ticking(0, 30);
        let wait = busy_wait(&clock, Duration::from_millis(100))?;

        assert_eq!(wait.finished_ms, 120);
        assert_eq!(wait.overshoot_ms(), 20);
        Ok(())
    }

    #[test]
    fn test_deadline_saturates_near_max() -> ClockResult<()> {
        let clock = ManualClock::ticking(u64::MAX - 5, 5);
        let wait = busy_wait(&clock, Duration::from_millis(1_000))?;

        assert_eq!(wait.deadline_ms, u64::MAX);
        assert_eq!(wait.finished_ms, u64::MAX);
        Ok(())
    }

    #[test]
    fn test_sub_millisecond_duration_truncates_to_zero() -> ClockResult<()> {
        let clock = ManualClock::new(9);
        let wait = busy_wait(&clock, Duration::from_micros(999))?;
        assert_eq!(wait.deadline_ms, 9);
        assert_eq!(wait.polls, 1);
        Ok(())
    }
}
