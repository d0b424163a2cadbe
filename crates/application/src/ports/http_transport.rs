//! HTTP transport port

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use courier_domain::ResolvedRequest;
use futures::Stream;
use thiserror::Error;

/// Body of a response, delivered chunk by chunk.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send>>;

/// Errors raised while exchanging a request with the server.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The exchange took longer than allowed.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// No connection could be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was reached.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// The redirect limit.
        max: usize,
    },

    /// Reading the body failed part way.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if the error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// A response as returned by the transport, body not yet consumed.
pub struct ResponseDescriptor {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, in received order.
    pub headers: Vec<(String, String)>,
    /// The body stream.
    pub body: BodyStream,
}

impl ResponseDescriptor {
    /// Creates a descriptor whose body is a single in-memory chunk.
    #[must_use]
    pub fn from_bytes(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body: Box::pin(futures::stream::once(async move { Ok(body) })),
        }
    }

    /// Returns the first header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the body is gzip encoded.
    #[must_use]
    pub fn is_gzipped(&self) -> bool {
        self.header("content-encoding")
            .is_some_and(|encoding| encoding.trim().eq_ignore_ascii_case("gzip"))
    }
}

impl fmt::Debug for ResponseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseDescriptor")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Port for sending a fully resolved request.
///
/// Connection pooling, TLS and proxies are the implementation's concern.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the response head with a streamed body.
    ///
    /// # Errors
    ///
    /// Returns an error if no response head could be obtained.
    async fn execute(&self, request: &ResolvedRequest) -> Result<ResponseDescriptor, TransportError>;
}
