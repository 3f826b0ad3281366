//! Error types for the turnloop CLI

use thiserror::Error;
use turnloop_runtime::RuntimeError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Demo run failed: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
