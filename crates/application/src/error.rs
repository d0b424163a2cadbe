//! Engine error types
//!
//! Errors from variable resolution and action execution funnel into
//! [`ExecutionError`]. The shortcut runner is the single place that turns
//! them into a [`RunOutcome`](crate::execution::RunOutcome).

use courier_domain::DomainError;
use thiserror::Error;

use crate::ports::{RepositoryError, StorageError, StoredResponse, TransportError};

/// Everything that can stop an action or a variable resolution.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Invalid user input or an invalid user-supplied setting.
    #[error("{0}")]
    User(String),

    /// Stored definitions the engine cannot use.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A prompt was needed while no user interface is attached.
    #[error("no user interface available to show {0}")]
    NoUiAvailable(&'static str),

    /// A domain validation error occurred.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// The variable store failed.
    #[error("variable store error: {0}")]
    Repository(#[from] RepositoryError),

    /// The HTTP exchange failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be stored.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The server answered with an error status.
    #[error("request failed with HTTP status {status}")]
    HttpStatus {
        /// Status code of the response.
        status: u16,
        /// The stored error response.
        response: StoredResponse,
    },

    /// The user or the caller cancelled the run.
    #[error("run cancelled")]
    Cancelled,
}

impl ExecutionError {
    /// Creates a user error.
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true for cancellation, which is not a failure.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true for conditions a best-effort action may skip over.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoUiAvailable(_))
    }
}

/// Result type alias for engine operations.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ExecutionError::Cancelled.is_cancellation());
        assert!(!ExecutionError::user("bad").is_cancellation());
        assert!(ExecutionError::NoUiAvailable("a dialog").is_recoverable());
        assert!(!ExecutionError::configuration("x").is_recoverable());
    }

    #[test]
    fn test_user_error_message_is_verbatim() {
        assert_eq!(
            ExecutionError::user("Invalid time format").to_string(),
            "Invalid time format"
        );
    }
}
