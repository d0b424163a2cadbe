//! Reading action parameters from stored data.

use courier_domain::ActionData;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use super::registry::ActionBuildError;

/// Deserializes the data of a `type_tag` record into its parameter struct.
pub(crate) fn parse<T: DeserializeOwned>(
    type_tag: &str,
    data: &ActionData,
) -> Result<T, ActionBuildError> {
    serde_json::from_value(Value::Object(data.clone()))
        .map_err(|e| ActionBuildError::new(type_tag, e.to_string()))
}

/// Reads a template parameter. Scalars are accepted and written as text,
/// `null` reads as empty.
pub(crate) fn template<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}
