//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A variable key does not match the placeholder key grammar.
    #[error("invalid variable key: {0:?}")]
    InvalidVariableKey(String),

    /// The kind-specific configuration of a variable could not be read.
    #[error("invalid configuration for variable '{key}': {message}")]
    InvalidVariableConfig {
        /// Key of the offending variable.
        key: String,
        /// What was wrong with the configuration.
        message: String,
    },

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
