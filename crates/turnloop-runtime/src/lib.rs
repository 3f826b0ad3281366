//! Single-threaded cooperative event loop with a deferred-callback queue.
//!
//! This crate models the ordering rule of a run-to-completion event loop:
//! a callback queued with [`EventLoop::set_timeout`] never runs inline and
//! never interrupts the code that queued it, whatever delay it asked for.
//! It runs only once the current synchronous turn has returned to the loop.
//!
//! - **EventLoop**: owns the clock, the output sink and the timer queue
//! - **TimerQueue**: min-heap of pending callbacks keyed by due time
//! - **LatenessMetrics**: how far past their due time callbacks actually ran
//! - **run_driver**: the sequential driver that prints `start`, `End`,
//!   `While expires` and, from a zero-delay callback, `Callback`
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use turnloop_clock::ManualClock;
//! use turnloop_runtime::{DriverConfig, EventLoop, run_driver};
//!
//! let mut event_loop = EventLoop::new(ManualClock::ticking(0, 50), Vec::new());
//! let config = DriverConfig::new().with_busy_wait(Duration::from_millis(500));
//! let report = run_driver(&mut event_loop, &config)?;
//!
//! assert_eq!(event_loop.output(), b"start\nEnd\nWhile expires\nCallback\n");
//! assert!(report.blocked_for_ms() >= 500);
//! # Ok::<(), turnloop_runtime::RuntimeError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]

pub mod driver;
pub mod error;
pub mod event_loop;
pub mod metrics;
pub mod prelude;
pub mod timer;

pub use driver::{DriverConfig, DriverReport, run_driver};
pub use error::{RuntimeError, RuntimeResult};
pub use event_loop::{Callback, EventLoop, RunReport};
pub use metrics::LatenessMetrics;
pub use timer::{TimerId, TimerQueue, normalize_delay_ms};
