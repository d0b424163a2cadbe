//! Variable model
//!
//! A variable is a named, typed input that is resolved when a shortcut runs.
//! Templates reference variables by id through `{{id}}` placeholders.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;

/// Resolved values of one run, keyed by variable id.
pub type VariableValueMap = HashMap<String, String>;

/// Kind-specific configuration as stored alongside a variable.
pub type VariableConfig = serde_json::Map<String, Value>;

/// The kind of a variable, selecting how its value is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Fixed stored value.
    Constant,
    /// Free text typed by the user.
    Text,
    /// Masked text typed by the user.
    Password,
    /// Numeric input typed by the user.
    Number,
    /// Numeric input picked from a range.
    Slider,
    /// Date picked by the user.
    Date,
    /// Time picked by the user.
    Time,
    /// One or more options picked from a list.
    Select,
    /// Color picked by the user.
    Color,
    /// Cycles through a list of options on every use.
    Toggle,
    /// Counter increased on every use.
    Increment,
    /// Random UUID.
    Uuid,
    /// Current time.
    Timestamp,
}

impl VariableKind {
    /// Returns all variable kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Constant,
            Self::Text,
            Self::Password,
            Self::Number,
            Self::Slider,
            Self::Date,
            Self::Time,
            Self::Select,
            Self::Color,
            Self::Toggle,
            Self::Increment,
            Self::Uuid,
            Self::Timestamp,
        ]
    }

    /// Returns the stored name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Text => "text",
            Self::Password => "password",
            Self::Number => "number",
            Self::Slider => "slider",
            Self::Date => "date",
            Self::Time => "time",
            Self::Select => "select",
            Self::Color => "color",
            Self::Toggle => "toggle",
            Self::Increment => "increment",
            Self::Uuid => "uuid",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Stable identifier, referenced by placeholders.
    pub id: String,
    /// Human-readable key, unique among all variables.
    pub key: String,
    /// How the value is obtained.
    pub kind: VariableKind,
    /// Title shown on prompts.
    #[serde(default)]
    pub title: String,
    /// Message shown on prompts.
    #[serde(default)]
    pub message: String,
    /// Kind-specific configuration.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub config: VariableConfig,
    /// Whether the last resolved value is persisted.
    #[serde(default)]
    pub remember_value: bool,
    /// Last persisted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Variable {
    /// Creates a variable with a fresh id and no configuration.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            id: generate_id(),
            key: key.into(),
            kind,
            title: String::new(),
            message: String::new(),
            config: VariableConfig::new(),
            remember_value: false,
            value: None,
        }
    }

    /// Creates a constant variable holding `value`.
    #[must_use]
    pub fn constant(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, VariableKind::Constant).with_value(value)
    }

    /// Replaces the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the stored value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the prompt title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enables persisting the resolved value.
    #[must_use]
    pub const fn remembering(mut self) -> Self {
        self.remember_value = true;
        self
    }

    /// Sets a single configuration entry.
    #[must_use]
    pub fn with_config(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(name.into(), value.into());
        self
    }

    /// Returns the stored value when the variable remembers its value.
    #[must_use]
    pub fn remembered_value(&self) -> Option<&str> {
        if self.remember_value {
            self.value.as_deref().filter(|v| !v.is_empty())
        } else {
            None
        }
    }

    /// Reads the kind-specific configuration into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVariableConfig` if the stored
    /// configuration does not match the expected shape.
    pub fn config_as<T: DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_value(Value::Object(self.config.clone())).map_err(|e| {
            DomainError::InvalidVariableConfig {
                key: self.key.clone(),
                message: e.to_string(),
            }
        })
    }

    /// Checks the identity invariants of the variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or the key is not a valid
    /// variable key.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "variable id must not be empty".to_string(),
            ));
        }
        if !is_valid_key(&self.key) {
            return Err(DomainError::InvalidVariableKey(self.key.clone()));
        }
        Ok(())
    }
}

/// Returns true if `key` is a valid variable key: one or more ASCII
/// letters, digits or underscores.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
