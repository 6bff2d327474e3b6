//! Error types for the zfsprops crate

use thiserror::Error;

/// Errors that can occur while reconciling dataset properties
#[derive(Error, Debug)]
pub enum Error {
    /// A required input location was not configured
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed record in the property listing
    #[error("invalid property record at line {line}: {message}")]
    Parse {
        /// 1-based line number in the raw listing
        line: usize,
        /// What was wrong with the record
        message: String,
    },

    /// A change with neither an expected nor an actual value
    #[error("change for {dataset}:{property} has neither expected nor actual value")]
    InvariantViolation {
        /// Dataset the change refers to
        dataset: String,
        /// Property the change refers to
        property: String,
    },

    /// A plan step failed when run
    #[error("step `{step}` failed: {message}")]
    Execution {
        /// The step, rendered as a command line
        step: String,
        /// Failure reported by the step runner
        message: String,
    },

    /// Desired-state document could not be decoded
    #[error("invalid desired state document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for zfsprops operations
pub type Result<T> = std::result::Result<T, Error>;
