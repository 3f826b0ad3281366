//! Single-threaded cooperative event loop.
//!
//! The loop owns the deferred-callback queue. Synchronous code runs in
//! *turns*: the main routine is the first turn and every fired callback is
//! a turn of its own. A turn is never interrupted; the queue is only looked
//! at once the current turn has returned.

use crate::error::{RuntimeError, RuntimeResult};
use crate::metrics::LatenessMetrics;
use crate::timer::{TimerId, TimerQueue};
use core::fmt;
use core::time::Duration;
use std::io::Write;
use tracing::{debug, info};
use turnloop_clock::{Clock, duration_to_ms};

/// Deferred work queued on an [`EventLoop`].
pub type Callback<C, W> = Box<dyn FnOnce(&mut EventLoop<C, W>) -> RuntimeResult>;

/// Summary of one [`EventLoop::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Turns executed, the main routine included
    pub turns: u64,
    /// Deferred callbacks that fired
    pub callbacks_run: u64,
    /// How late each callback ran relative to its due time
    pub lateness: LatenessMetrics,
}

/// A single-threaded event loop over clock `C` writing lines to `W`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use turnloop_clock::ManualClock;
/// use turnloop_runtime::EventLoop;
///
/// let mut event_loop = EventLoop::new(ManualClock::new(0), Vec::new());
/// event_loop.run(|el| {
///     el.set_timeout(Duration::ZERO, |el| el.println("later"))?;
///     el.println("now")
/// })?;
///
/// assert_eq!(event_loop.output(), b"now\nlater\n");
/// # Ok::<(), turnloop_runtime::RuntimeError>(())
/// ```
pub struct EventLoop<C, W> {
    clock: C,
    out: W,
    timers: TimerQueue<Callback<C, W>>,
    in_turn: bool,
    turns: u64,
    lateness: LatenessMetrics,
}

impl<C: Clock, W: Write> EventLoop<C, W> {
    /// Create a loop with an empty queue.
    pub fn new(clock: C, out: W) -> Self {
        Self {
            clock,
            out,
            timers: TimerQueue::new(),
            in_turn: false,
            turns: 0,
            lateness: LatenessMetrics::new(),
        }
    }

    /// Write `line` and a newline to the output sink, then flush.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Output`] if the sink rejects the write.
    pub fn println(&mut self, line: &str) -> RuntimeResult {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Sample the loop's clock.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Clock`] if the clock cannot be read.
    pub fn now_ms(&self) -> RuntimeResult<u64> {
        Ok(self.clock.now_ms()?)
    }

    /// Queue `callback` to run no earlier than `delay` from now.
    ///
    /// Registration never runs the callback. It becomes eligible only after
    /// the current turn returns to the loop and its due time has passed.
    /// Zero and out-of-range delays are normalized, see
    /// [`normalize_delay_ms`](crate::timer::normalize_delay_ms).
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Clock`] if the clock cannot be read.
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F) -> RuntimeResult<TimerId>
    where
        F: FnOnce(&mut EventLoop<C, W>) -> RuntimeResult + 'static,
    {
        let now_ms = self.clock.now_ms()?;
        let id = self.timers.schedule(now_ms, delay, Box::new(callback));
        debug!(
            timer = %id,
            now_ms,
            requested_ms = duration_to_ms(delay),
            next_due_ms = self.timers.next_due_ms(),
            "timer scheduled"
        );
        Ok(id)
    }

    /// Run `main` as a synchronous turn, then drain the deferred queue.
    ///
    /// Draining takes the earliest pending timer each time. If it is not due
    /// yet the loop idles on the clock until it is. Every callback runs as
    /// its own turn and may queue further timers; the run ends when the
    /// queue is empty.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Reentrant`] if called from inside a turn, and
    /// propagates the first error returned by `main` or a callback. Timers
    /// still queued at that point stay queued.
    pub fn run<F>(&mut self, main: F) -> RuntimeResult<RunReport>
    where
        F: FnOnce(&mut EventLoop<C, W>) -> RuntimeResult,
    {
        if self.in_turn {
            return Err(RuntimeError::Reentrant);
        }

        let mut report = RunReport::default();
        self.turn(main)?;
        report.turns = 1;

        while let Some(due_ms) = self.timers.next_due_ms() {
            let now_ms = self.clock.now_ms()?;
            let Some(entry) = self.timers.pop_due(now_ms) else {
                debug!(due_ms, now_ms, "idling until next timer");
                self.clock.idle_until(due_ms)?;
                continue;
            };

            report.lateness.record(entry.due_ms, now_ms);
            debug!(
                timer = %entry.id,
                due_ms = entry.due_ms,
                fired_ms = now_ms,
                lateness_ms = report.lateness.last_lateness_ms,
                "timer fired"
            );

            self.turn(entry.payload)?;
            report.turns = report.turns.saturating_add(1);
            report.callbacks_run = report.callbacks_run.saturating_add(1);
        }

        self.lateness.merge(&report.lateness);
        info!(
            turns = report.turns,
            callbacks_run = report.callbacks_run,
            max_lateness_ms = report.lateness.max_lateness_ms,
            "event loop drained"
        );
        Ok(report)
    }

    fn turn<F>(&mut self, work: F) -> RuntimeResult
    where
        F: FnOnce(&mut EventLoop<C, W>) -> RuntimeResult,
    {
        self.in_turn = true;
        let result = work(self);
        self.in_turn = false;
        self.turns = self.turns.saturating_add(1);
        result
    }
}

impl<C, W> EventLoop<C, W> {
    /// The loop's clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The output sink.
    #[inline]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the loop and return the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Number of timers waiting in the queue.
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// True while a turn is executing.
    #[inline]
    pub fn is_in_turn(&self) -> bool {
        self.in_turn
    }

    /// Turns executed over the loop's lifetime.
    #[inline]
    pub fn total_turns(&self) -> u64 {
        self.turns
    }

    /// Lateness accumulated over every completed run.
    #[inline]
    pub fn lateness(&self) -> &LatenessMetrics {
        &self.lateness
    }
}

impl<C: fmt::Debug, W> fmt::Debug for EventLoop<C, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("clock", &self.clock)
            .field("timers", &self.timers)
            .field("in_turn", &self.in_turn)
            .field("turns", &self.turns)
            .finish_non_exhaustive()
    }
}
