//! Error types for the runtime crate.

use turnloop_clock::ClockError;

/// Environment failures surfaced by the event loop.
///
/// None of these are recoverable by the demo; they are propagated unchanged
/// to the process boundary.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Writing a line to the output sink failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The clock could not be read
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// `run` was called from inside a turn that is already executing
    #[error("event loop is already running a turn")]
    Reentrant,
}

impl RuntimeError {
    /// True if the failure came from the output sink.
    pub fn is_output(&self) -> bool {
        matches!(self, RuntimeError::Output(_))
    }
}

/// Result alias for event loop operations.
pub type RuntimeResult<T = ()> = Result<T, RuntimeError>;
