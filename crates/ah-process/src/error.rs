//! Process engine errors.

use ah_psychro::PsychroError;
use thiserror::Error;

/// Result type for process operations.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors that can occur while applying a process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// A referenced upstream point is missing or not completed.
    #[error("Upstream state point '{point}' is not resolved")]
    UpstreamUnresolved { point: String },

    /// A required parameter is missing or non-physical.
    #[error("Invalid parameters for process '{process}': {what}")]
    InvalidProcessParameters { process: String, what: String },

    /// Property calculation failed while computing the outlet.
    #[error("Psychrometric error: {0}")]
    Psychro(#[from] PsychroError),
}

impl ProcessError {
    pub(crate) fn invalid(process: &str, what: impl Into<String>) -> Self {
        Self::InvalidProcessParameters {
            process: process.to_string(),
            what: what.into(),
        }
    }
}
