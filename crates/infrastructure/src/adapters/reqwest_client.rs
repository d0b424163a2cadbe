//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. The response body is
//! handed back as a stream so large downloads never sit in memory.

use std::time::Duration;

use async_trait::async_trait;
use courier_application::ports::{HttpTransport, ResponseDescriptor, TransportError};
use courier_domain::{EngineSettings, HttpMethod, ResolvedRequest};
use futures::StreamExt;
use reqwest::{Client, Method, Url};
use tracing::debug;

/// HTTP transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpTransport {
    client: Client,
    max_redirects: usize,
}

impl ReqwestHttpTransport {
    /// Creates a transport configured from `settings`.
    ///
    /// Redirects are followed up to `settings.max_redirects` and TLS
    /// verification stays enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(settings: &EngineSettings) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client,
            max_redirects: settings.max_redirects,
        })
    }

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, max_redirects: usize) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64, max_redirects: usize) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        if error.is_redirect() {
            return TransportError::TooManyRedirects { max: max_redirects };
        }
        if error.is_body() || error.is_decode() {
            return TransportError::Body(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

fn millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn execute(&self, request: &ResolvedRequest) -> Result<ResponseDescriptor, TransportError> {
        let url = Url::parse(request.url.trim())
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;
        let timeout_ms = millis(request.timeout);
        let max_redirects = self.max_redirects;

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(request.timeout);

        for header in &request.headers {
            builder = builder.header(&header.name, &header.value);
        }

        if request.method.sends_body() {
            if let Some(content_type) = &request.content_type
                && request.header("content-type").is_none()
            {
                builder = builder.header("Content-Type", content_type);
            }
            builder = builder.body(request.body.clone());
        }

        debug!(method = %request.method.as_str(), url = %request.url, "sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms, max_redirects))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response.bytes_stream().map(move |chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| Self::map_error(&e, timeout_ms, max_redirects))
        });

        Ok(ResponseDescriptor {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}
