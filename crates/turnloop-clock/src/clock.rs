//! The clock abstraction shared by the event loop and the busy-wait.

use crate::error::ClockResult;

/// A millisecond-resolution time source for a single thread.
///
/// `now_ms` is what the busy-wait polls. `idle_until` is only ever called by
/// the event loop while it has nothing runnable; synchronous code must never
/// call it, since doing so would hand the thread back to the scheduler.
pub trait Clock {
    /// Sample the current time in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying time source cannot be read.
    fn now_ms(&self) -> ClockResult;

    /// Block the loop until `deadline_ms` has been reached.
    ///
    /// Returns immediately if the deadline is already in the past.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying time source cannot be read.
    fn idle_until(&self, deadline_ms: u64) -> ClockResult<()>;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ms(&self) -> ClockResult {
        (**self).now_ms()
    }

    #[inline]
    fn idle_until(&self, deadline_ms: u64) -> ClockResult<()> {
        (**self).idle_until(deadline_ms)
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    #[inline]
    fn now_ms(&self) -> ClockResult {
        (**self).now_ms()
    }

    #[inline]
    fn idle_until(&self, deadline_ms: u64) -> ClockResult<()> {
        (**self).idle_until(deadline_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn sample<C: Clock>(clock: C) -> ClockResult {
        clock.now_ms()
    }

    #[test]
    fn test_reference_forwards_to_inner_clock() -> ClockResult<()> {
        let clock = ManualClock::new(7);
        assert_eq!(sample(&clock)?, 7);

        (&clock).idle_until(20)?;
        assert_eq!(clock.now_ms()?, 20);
        Ok(())
    }

    #[test]
    fn test_boxed_dyn_clock() -> ClockResult<()> {
        let clock: Box<dyn Clock> = Box::new(ManualClock::new(3));
        assert_eq!(clock.now_ms()?, 3);
        Ok(())
    }
}
