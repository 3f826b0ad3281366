//! Property-based tests for the busy-wait.

use proptest::prelude::*;
use std::time::Duration;
use turnloop_clock::{ManualClock, busy_wait};

proptest! {
    #[test]
    fn prop_busy_wait_never_returns_before_deadline(
        start in 0u64..1_000_000_000,
        duration_ms in 0u64..20_000,
        step in 1u64..500,
    ) {
        let clock = ManualClock::ticking(start, step);
        let wait = busy_wait(&clock, Duration::from_millis(duration_ms))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(wait.started_ms, start);
        prop_assert_eq!(wait.deadline_ms, start + duration_ms);
        prop_assert!(wait.finished_ms >= wait.deadline_ms);
        prop_assert!(wait.elapsed_ms() >= duration_ms);
        // the loop stops at the first sample past the deadline
        prop_assert!(wait.overshoot_ms() <= step);
    }

    #[test]
    fn prop_poll_count_matches_clock_step(
        duration_ms in 1u64..20_000,
        step in 1u64..500,
    ) {
        let clock = ManualClock::ticking(0, step);
        let wait = busy_wait(&clock, Duration::from_millis(duration_ms))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(wait.polls, duration_ms.div_ceil(step));
        prop_assert_eq!(clock.samples(), wait.polls + 1);
    }
}
