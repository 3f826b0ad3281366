//! Millisecond clocks and a non-yielding busy-wait.
//!
//! This crate provides the time sources used by the turnloop event loop and
//! its sequential driver:
//!
//! - **SystemClock**: milliseconds since the Unix epoch (wall clock)
//! - **MonotonicClock**: milliseconds since construction, never goes backwards
//! - **ManualClock**: simulated time for deterministic tests
//! - **busy_wait**: a CPU-bound polling loop that blocks the calling thread
//!   until a deadline without sleeping or yielding
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use turnloop_clock::{busy_wait, ManualClock};
//!
//! let clock = ManualClock::ticking(0, 100);
//! let wait = busy_wait(&clock, Duration::from_millis(1_000))?;
//!
//! assert!(wait.finished_ms >= wait.deadline_ms);
//! assert_eq!(wait.deadline_ms, 1_000);
//! # Ok::<(), turnloop_clock::ClockError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod busy_wait;
pub mod clock;
pub mod error;
pub mod manual;
pub mod prelude;
pub mod system;

pub use busy_wait::{BusyWait, busy_wait};
pub use clock::Clock;
pub use error::{ClockError, ClockResult};
pub use manual::ManualClock;
pub use system::{MonotonicClock, SystemClock};

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
#[inline]
pub fn duration_to_ms(duration: core::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
