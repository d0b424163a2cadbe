//! Placeholder-free request handed to the transport

use std::time::Duration;

use super::{Header, HttpMethod};

/// A request whose templates have all been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Final URL.
    pub url: String,
    /// Final headers, in declaration order.
    pub headers: Vec<Header>,
    /// Final body; empty when the method sends none.
    pub body: String,
    /// Content type of the body, if declared.
    pub content_type: Option<String>,
    /// Time allowed for the exchange.
    pub timeout: Duration,
}

impl ResolvedRequest {
    /// Returns the value of the first header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Checks that the URL is absolute http(s).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUrl` when the URL is empty or uses
    /// another scheme.
    pub fn validate(&self) -> crate::DomainResult<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(crate::DomainError::InvalidUrl("URL is required".to_string()));
        }
        let lower = url.to_ascii_lowercase();
        if !lower.starts_with("http://") && !lower.starts_with("https://") {
            return Err(crate::DomainError::InvalidUrl(format!(
                "URL must start with http:// or https://: {url}"
            )));
        }
        Ok(())
    }
}
