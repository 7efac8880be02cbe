//! Error types for step analysis.

use thiserror::Error;

/// Errors that can occur while writing a step report.
#[derive(Debug, Error)]
pub enum StepError {
    /// Writing to the report sink failed
    #[error("Sink write error: {0}")]
    Io(#[from] std::io::Error),

    /// Another thread panicked while holding the sink
    #[error("Report sink lock is poisoned")]
    SinkPoisoned,
}

/// Result type for step analysis operations.
pub type StepResult<T> = Result<T, StepError>;
