//! The sequential driver: three prints, one deferred print and a busy-wait.
//!
//! The driver registers a callback before blocking the thread well past the
//! callback's requested delay. Because the busy-wait never returns control
//! to the loop, the callback's line always comes last.

use crate::error::RuntimeResult;
use crate::event_loop::{EventLoop, RunReport};
use core::time::Duration;
use std::io::Write;
use tracing::info;
use turnloop_clock::{BusyWait, Clock, busy_wait};

/// First line, printed before anything is scheduled.
pub const START_LINE: &str = "start";
/// Printed right after the callback is registered.
pub const END_LINE: &str = "End";
/// Printed once the busy-wait has reached its deadline.
pub const WHILE_EXPIRES_LINE: &str = "While expires";
/// Printed by the deferred callback.
pub const CALLBACK_LINE: &str = "Callback";

/// Default busy-wait length in milliseconds.
pub const DEFAULT_BUSY_WAIT_MS: u64 = 10_000;

/// Expected output for any busy-wait long enough to outlast the callback's
/// delay.
pub const EXPECTED_LINES: [&str; 4] = [START_LINE, END_LINE, WHILE_EXPIRES_LINE, CALLBACK_LINE];

/// Driver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Delay requested for the deferred callback
    pub callback_delay: Duration,
    /// How long the driver blocks the thread
    pub busy_wait: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            callback_delay: Duration::ZERO,
            busy_wait: Duration::from_millis(DEFAULT_BUSY_WAIT_MS),
        }
    }
}

impl DriverConfig {
    /// Create the default configuration (0 ms delay, 10 s busy-wait).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback's requested delay.
    #[must_use]
    pub fn with_callback_delay(mut self, delay: Duration) -> Self {
        self.callback_delay = delay;
        self
    }

    /// Set the busy-wait length.
    #[must_use]
    pub fn with_busy_wait(mut self, duration: Duration) -> Self {
        self.busy_wait = duration;
        self
    }
}

/// What the driver observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverReport {
    /// Clock reading right after `End` was printed
    pub end_printed_ms: u64,
    /// Clock reading right before `While expires` was printed
    pub while_expires_ms: u64,
    /// The busy-wait record
    pub busy_wait: BusyWait,
    /// The event loop's run summary
    pub run: RunReport,
}

impl DriverReport {
    /// Milliseconds between printing `End` and printing `While expires`.
    #[inline]
    pub fn blocked_for_ms(&self) -> u64 {
        self.while_expires_ms.saturating_sub(self.end_printed_ms)
    }
}

/// Run the driver on `event_loop` and drain it.
///
/// In order: print `start`, register the callback, print `End`, busy-wait,
/// print `While expires`. The callback prints `Callback` once the loop gets
/// control back.
///
/// # Errors
///
/// Propagates output and clock failures unchanged.
pub fn run_driver<C, W>(
    event_loop: &mut EventLoop<C, W>,
    config: &DriverConfig,
) -> RuntimeResult<DriverReport>
where
    C: Clock,
    W: Write,
{
    let mut end_printed_ms = 0;
    let mut while_expires_ms = 0;
    let mut waited = None;

    let run = event_loop.run(|el| {
        el.println(START_LINE)?;
        el.set_timeout(config.callback_delay, |el| el.println(CALLBACK_LINE))?;
        el.println(END_LINE)?;
        end_printed_ms = el.now_ms()?;

        waited = Some(busy_wait(el.clock(), config.busy_wait)?);

        while_expires_ms = el.now_ms()?;
        el.println(WHILE_EXPIRES_LINE)
    })?;

    let report = DriverReport {
        end_printed_ms,
        while_expires_ms,
        busy_wait: waited.unwrap_or_default(),
        run,
    };

    info!(
        blocked_for_ms = report.blocked_for_ms(),
        polls = report.busy_wait.polls,
        callback_lateness_ms = report.run.lateness.max_lateness_ms,
        "driver finished"
    );
    Ok(report)
}
