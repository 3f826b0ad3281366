//! turnloop - deferred callback ordering demo
//!
//! Prints `start`, queues a zero-delay callback, prints `End`, spins the
//! only thread for ten seconds, prints `While expires`, and only then lets
//! the event loop run the callback, which prints `Callback`.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod error;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use turnloop_clock::{Clock, MonotonicClock, SystemClock};
use turnloop_runtime::driver::DEFAULT_BUSY_WAIT_MS;
use turnloop_runtime::{DriverConfig, DriverReport, EventLoop, run_driver};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "turnloop")]
#[command(about = "Show a zero-delay callback waiting out a busy-wait on a single-threaded event loop")]
#[command(version)]
#[command(long_about = "
turnloop registers a zero-delay callback, then blocks its only thread in a
busy-wait that never yields. The callback runs only after the synchronous
code finishes, so stdout is always:

    start
    End
    While expires
    Callback

Diagnostics go to stderr; stdout carries only those four lines.
")]
struct Cli {
    /// Requested callback delay in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 0)]
    delay_ms: u64,

    /// Busy-wait length in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_BUSY_WAIT_MS)]
    busy_wait_ms: u64,

    /// Time source polled by the busy-wait
    #[arg(long, value_enum, default_value_t = ClockKind::Wall)]
    clock: ClockKind,

    /// Verbose logging on stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ClockKind {
    /// Milliseconds since the Unix epoch
    Wall,
    /// Milliseconds since process start, never goes backwards
    Monotonic,
}

impl Cli {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig::new()
            .with_callback_delay(Duration::from_millis(self.delay_ms))
            .with_busy_wait(Duration::from_millis(self.busy_wait_ms))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = cli.driver_config();
    tracing::debug!(?config, clock = ?cli.clock, "starting driver");

    let report = match cli.clock {
        ClockKind::Wall => execute(SystemClock::new(), &config),
        ClockKind::Monotonic => execute(MonotonicClock::new(), &config),
    }?;

    tracing::info!(
        blocked_for_ms = report.blocked_for_ms(),
        turns = report.run.turns,
        "done"
    );
    Ok(())
}

fn init_logging(verbose: u8) -> Result<(), CliError> {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("turnloop={log_level},turnloop_runtime={log_level},turnloop_clock={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

fn execute<C: Clock>(clock: C, config: &DriverConfig) -> Result<DriverReport, CliError> {
    let mut event_loop = EventLoop::new(clock, io::stdout().lock());
    Ok(run_driver(&mut event_loop, config)?)
}
