//! Stored action definitions.
//!
//! Actions are persisted as `{type, data}` records. The engine turns each
//! record into an executable action at the start of every run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form parameters of a stored action.
pub type ActionData = serde_json::Map<String, Value>;

/// A stored action: a type tag plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Stable tag selecting the action kind.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Kind-specific parameters.
    #[serde(default)]
    pub data: ActionData,
}

impl ActionRecord {
    /// Creates a record without parameters.
    #[must_use]
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            data: ActionData::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }
}

/// How an action can be written as a function call in a script.
///
/// `parameters` lists the data keys in call-argument order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionAlias {
    /// Function name used in scripts.
    pub function_name: &'static str,
    /// Data keys, in argument order.
    pub parameters: &'static [&'static str],
}

impl ActionAlias {
    /// Creates an alias.
    #[must_use]
    pub const fn new(function_name: &'static str, parameters: &'static [&'static str]) -> Self {
        Self {
            function_name,
            parameters,
        }
    }
}
