//! Text transformations and generated values

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use courier_domain::{ActionAlias, ActionData};
use serde::Deserialize;

use crate::actions::params::{self, template};
use crate::actions::{Action, ActionBuildError};
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;

/// A reversible text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Standard base64 with padding.
    Base64Encode,
    /// Inverse of [`Transform::Base64Encode`]; the result must be UTF-8.
    Base64Decode,
    /// Percent-encoding of everything but unreserved characters.
    UrlEncode,
    /// Inverse of [`Transform::UrlEncode`].
    UrlDecode,
}

impl Transform {
    /// Stable tag of the action kind.
    #[must_use]
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::Base64Encode => "base64_encode",
            Self::Base64Decode => "base64_decode",
            Self::UrlEncode => "url_encode",
            Self::UrlDecode => "url_decode",
        }
    }

    /// Script alias of the action kind.
    #[must_use]
    pub const fn alias(self) -> ActionAlias {
        let name = match self {
            Self::Base64Encode => "base64encode",
            Self::Base64Decode => "base64decode",
            Self::UrlEncode => "encodeURIComponent",
            Self::UrlDecode => "decodeURIComponent",
        };
        ActionAlias::new(name, &["text"])
    }

    /// Applies the transformation.
    ///
    /// # Errors
    ///
    /// Decoding fails with a user error on malformed input.
    pub fn apply(self, text: &str) -> ExecutionResult<String> {
        match self {
            Self::Base64Encode => Ok(STANDARD.encode(text)),
            Self::Base64Decode => {
                let bytes = STANDARD
                    .decode(text.trim())
                    .map_err(|e| ExecutionError::user(format!("Invalid base64 input: {e}")))?;
                String::from_utf8(bytes)
                    .map_err(|_| ExecutionError::user("Decoded base64 is not valid text"))
            }
            Self::UrlEncode => Ok(urlencoding::encode(text).into_owned()),
            Self::UrlDecode => urlencoding::decode(text)
                .map(std::borrow::Cow::into_owned)
                .map_err(|e| ExecutionError::user(format!("Invalid URL-encoded input: {e}"))),
        }
    }
}

#[derive(Deserialize)]
struct TransformParams {
    #[serde(default, deserialize_with = "template")]
    text: String,
}

/// Outputs its text parameter transformed.
#[derive(Debug, Clone)]
pub struct TransformAction {
    transform: Transform,
    text: String,
}

impl TransformAction {
    pub(crate) fn from_data(
        transform: Transform,
        data: &ActionData,
    ) -> Result<Self, ActionBuildError> {
        let params: TransformParams = params::parse(transform.type_tag(), data)?;
        Ok(Self {
            transform,
            text: params.text,
        })
    }
}

#[async_trait]
impl Action for TransformAction {
    fn type_tag(&self) -> &'static str {
        self.transform.type_tag()
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let text = ctx.resolve_template(&self.text).await?;
        self.transform.apply(&text).map(Some)
    }
}

/// Outputs a random UUID.
#[derive(Debug, Clone, Deserialize)]
pub struct UuidAction {}

#[async_trait]
impl Action for UuidAction {
    fn type_tag(&self) -> &'static str {
        "uuid"
    }

    async fn execute(&self, _ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        Ok(Some(uuid::Uuid::new_v4().to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base64() {
        assert_eq!(Transform::Base64Encode.apply("hello").unwrap(), "aGVsbG8=");
        assert_eq!(Transform::Base64Decode.apply("aGVsbG8=").unwrap(), "hello");
        assert!(matches!(
            Transform::Base64Decode.apply("not base64!"),
            Err(ExecutionError::User(_))
        ));
        assert!(matches!(
            Transform::Base64Decode.apply("/w=="),
            Err(ExecutionError::User(_))
        ));
    }

    #[test]
    fn test_url() {
        assert_eq!(
            Transform::UrlEncode.apply("a b&c=d/é").unwrap(),
            "a%20b%26c%3Dd%2F%C3%A9"
        );
        assert_eq!(Transform::UrlDecode.apply("a%20b%26c").unwrap(), "a b&c");
        assert!(matches!(
            Transform::UrlDecode.apply("%FF"),
            Err(ExecutionError::User(_))
        ));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Transform::UrlDecode.alias().function_name, "decodeURIComponent");
        assert_eq!(Transform::Base64Encode.alias().parameters, &["text"]);
    }
}
