//! Prelude module for common runtime types.
//!
//! Re-exports the clock types as well, since every loop needs one.

pub use crate::driver::{
    CALLBACK_LINE, DriverConfig, DriverReport, END_LINE, EXPECTED_LINES, START_LINE,
    WHILE_EXPIRES_LINE, run_driver,
};
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::event_loop::{EventLoop, RunReport};
pub use crate::metrics::LatenessMetrics;
pub use crate::timer::{TimerId, normalize_delay_ms};
pub use turnloop_clock::prelude::*;
