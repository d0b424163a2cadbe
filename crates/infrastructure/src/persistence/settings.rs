//! Engine settings persistence.
//!
//! Settings live in the platform-specific config directory:
//! - Linux: ~/.config/courier/settings.json
//! - macOS: ~/Library/Application Support/courier/settings.json
//! - Windows: %APPDATA%/courier/settings.json
//!
//! `COURIER_*` environment variables override individual fields.

use std::path::PathBuf;

use courier_domain::EngineSettings;

use crate::serialization::{SerializationError, read_json_file, write_json_file};

/// Environment variable overriding the response directory.
pub const ENV_RESPONSE_DIR: &str = "COURIER_RESPONSE_DIR";
/// Environment variable overriding the variables file.
pub const ENV_VARIABLES_FILE: &str = "COURIER_VARIABLES_FILE";
/// Environment variable overriding the default timeout in milliseconds.
pub const ENV_TIMEOUT_MS: &str = "COURIER_TIMEOUT_MS";
/// Environment variable overriding the User-Agent.
pub const ENV_USER_AGENT: &str = "COURIER_USER_AGENT";
/// Environment variable overriding the redirect limit.
pub const ENV_MAX_REDIRECTS: &str = "COURIER_MAX_REDIRECTS";

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading or parsing the settings file failed.
    #[error("Settings file error: {0}")]
    Serialization(#[from] SerializationError),

    /// An environment override could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidOverride {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Loads and saves [`EngineSettings`].
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    path: Option<PathBuf>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl SettingsLoader {
    /// Creates a loader for the settings file at `path`.
    #[must_use]
    pub const fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Returns the default settings path, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("courier").join("settings.json"))
    }

    /// Returns the path this loader reads.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Loads settings from disk; defaults apply when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub async fn load(&self) -> Result<EngineSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(EngineSettings::default());
        };
        Ok(read_json_file(path).await?.unwrap_or_default())
    }

    /// Loads settings and applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an override is invalid.
    pub async fn load_with_env(&self) -> Result<EngineSettings, SettingsError> {
        let mut settings = self.load().await?;
        apply_overrides(&mut settings, |name| std::env::var(name).ok())?;
        Ok(settings)
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is known or writing fails.
    pub async fn save(&self, settings: &EngineSettings) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Err(SettingsError::NoConfigDir);
        };
        write_json_file(path, settings).await?;
        Ok(())
    }
}

/// Applies `COURIER_*` overrides read through `lookup`.
///
/// Empty values are ignored.
///
/// # Errors
///
/// Returns `SettingsError::InvalidOverride` if a numeric override does not
/// parse.
pub fn apply_overrides(
    settings: &mut EngineSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(dir) = get(ENV_RESPONSE_DIR) {
        settings.response_dir = Some(PathBuf::from(dir));
    }
    if let Some(file) = get(ENV_VARIABLES_FILE) {
        settings.variables_file = Some(PathBuf::from(file));
    }
    if let Some(agent) = get(ENV_USER_AGENT) {
        settings.user_agent = agent;
    }
    if let Some(value) = get(ENV_TIMEOUT_MS) {
        settings.default_timeout_ms = parse_number(ENV_TIMEOUT_MS, value)?;
    }
    if let Some(value) = get(ENV_MAX_REDIRECTS) {
        settings.max_redirects = parse_number(ENV_MAX_REDIRECTS, value)?;
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidOverride { name, value })
}
