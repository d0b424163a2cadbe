//! Shortcut definition
//!
//! A shortcut is an HTTP request template plus the ordered actions that run
//! before the request, after a successful response, and after a failure.

use serde::{Deserialize, Serialize};

use crate::action::ActionRecord;
use crate::id::generate_id;
use crate::request::{Header, HttpMethod};

/// What to do with the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHandling {
    /// Keep a partially received body when the transport times out
    /// instead of failing the run.
    #[serde(default)]
    pub finish_normally_on_timeout: bool,
}

/// A stored shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// URL template.
    pub url: String,
    /// Header templates.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Body template.
    #[serde(default)]
    pub body: String,
    /// Content type of the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Request timeout; the engine default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Actions run before the request is built.
    #[serde(default)]
    pub prepare_actions: Vec<ActionRecord>,
    /// Actions run after a successful response.
    #[serde(default)]
    pub success_actions: Vec<ActionRecord>,
    /// Actions run after a failed request.
    #[serde(default)]
    pub failure_actions: Vec<ActionRecord>,
    /// Response handling options.
    #[serde(default)]
    pub response: ResponseHandling,
}

impl Shortcut {
    /// Creates a GET shortcut for `url`.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: String::new(),
            content_type: None,
            timeout_ms: None,
            prepare_actions: Vec::new(),
            success_actions: Vec::new(),
            failure_actions: Vec::new(),
            response: ResponseHandling::default(),
        }
    }

    /// Sets the method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Adds a header template.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    /// Sets the body template.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Appends a prepare action.
    #[must_use]
    pub fn with_prepare_action(mut self, action: ActionRecord) -> Self {
        self.prepare_actions.push(action);
        self
    }

    /// Appends a success action.
    #[must_use]
    pub fn with_success_action(mut self, action: ActionRecord) -> Self {
        self.success_actions.push(action);
        self
    }

    /// Appends a failure action.
    #[must_use]
    pub fn with_failure_action(mut self, action: ActionRecord) -> Self {
        self.failure_actions.push(action);
        self
    }

    /// Returns every request template, in the order they are sent: URL,
    /// header names and values, then the body when the method sends one.
    pub fn request_templates(&self) -> impl Iterator<Item = &str> {
        let body = self.method.sends_body().then_some(self.body.as_str());
        std::iter::once(self.url.as_str())
            .chain(
                self.headers
                    .iter()
                    .flat_map(|h| [h.name.as_str(), h.value.as_str()]),
            )
            .chain(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_minimal_stored_shortcut() {
        let shortcut: Shortcut =
            serde_json::from_value(json!({"name": "Ping", "url": "https://example.com"})).unwrap();
        assert_eq!(shortcut.method, HttpMethod::Get);
        assert!(shortcut.prepare_actions.is_empty());
        assert!(!shortcut.response.finish_normally_on_timeout);
        assert_eq!(shortcut.id.len(), 36);
    }

    #[test]
    fn test_stored_actions() {
        let shortcut: Shortcut = serde_json::from_value(json!({
            "name": "Ping",
            "url": "https://example.com",
            "prepare_actions": [{"type": "show_toast", "data": {"text": "hi"}}]
        }))
        .unwrap();
        assert_eq!(shortcut.prepare_actions[0].type_tag, "show_toast");
    }

    #[test]
    fn test_request_templates_skip_body_for_get() {
        let shortcut = Shortcut::new("s", "{{a}}")
            .with_header("X-{{b}}", "{{c}}")
            .with_body("{{d}}");
        let templates: Vec<_> = shortcut.request_templates().collect();
        assert_eq!(templates, vec!["{{a}}", "X-{{b}}", "{{c}}"]);

        let post = shortcut.with_method(HttpMethod::Post);
        let templates: Vec<_> = post.request_templates().collect();
        assert_eq!(templates, vec!["{{a}}", "X-{{b}}", "{{c}}", "{{d}}"]);
    }
}
