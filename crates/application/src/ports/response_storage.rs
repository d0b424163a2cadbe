//! Response storage port

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::http_transport::{ResponseDescriptor, TransportError};

/// A response whose body has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// File holding the decoded body.
    pub path: PathBuf,
    /// Number of decoded bytes written.
    pub size: u64,
    /// True if the transport timed out before the body was complete.
    pub truncated: bool,
}

impl StoredResponse {
    /// Returns true if the status code indicates a client or server error.
    #[must_use]
    pub const fn is_error_status(&self) -> bool {
        self.status >= 400
    }
}

/// Errors raised while persisting a response body.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading the body from the transport failed.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The body claimed an encoding it does not have.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

/// Port for persisting response bodies.
#[async_trait]
pub trait ResponseStorage: Send + Sync {
    /// Writes the body of `response` to a file owned by `session_id`,
    /// decoding gzip content first.
    ///
    /// With `finish_normally_on_timeout`, a timeout while reading the body
    /// keeps what was written so far instead of failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read, decoded or written.
    async fn store(
        &self,
        session_id: &str,
        response: ResponseDescriptor,
        finish_normally_on_timeout: bool,
    ) -> Result<StoredResponse, StorageError>;
}
