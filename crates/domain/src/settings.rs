//! Engine settings
//!
//! Defaults for values a shortcut does not specify itself, plus where the
//! engine keeps its files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings shared by every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Directory for stored response bodies. Platform cache dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_dir: Option<PathBuf>,
    /// File holding variable definitions and remembered values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_file: Option<PathBuf>,
    /// Timeout for shortcuts that do not declare one.
    pub default_timeout_ms: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// Maximum redirects followed by the transport.
    pub max_redirects: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            response_dir: None,
            variables_file: None,
            default_timeout_ms: 30_000,
            user_agent: concat!("Courier/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
        }
    }
}

impl EngineSettings {
    /// Returns the timeout for a shortcut declaring `timeout_ms`.
    #[must_use]
    pub fn timeout_for(&self, timeout_ms: Option<u64>) -> Duration {
        Duration::from_millis(timeout_ms.unwrap_or(self.default_timeout_ms))
    }
}
