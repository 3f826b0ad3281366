//! Prelude module for common clock types.

pub use crate::busy_wait::{BusyWait, busy_wait};
pub use crate::clock::Clock;
pub use crate::error::{ClockError, ClockResult};
pub use crate::manual::ManualClock;
pub use crate::system::{MonotonicClock, SystemClock};
