//! Placeholder substitution
//!
//! Replaces `{{id}}` tokens with values from a [`VariableValueMap`].

use courier_domain::VariableValueMap;

use super::parser::parse_placeholders;

/// Result of resolving a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The template with every token substituted.
    pub resolved: String,

    /// Ids that had no value and were replaced by the empty string.
    pub missing: Vec<String>,
}

impl ResolutionResult {
    /// Returns true if every referenced id had a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolves every placeholder in `template` against `values`.
///
/// Ids without a value resolve to the empty string. Substituted values are
/// not scanned again, so a value containing `{{...}}` text is kept as is.
///
/// # Examples
///
/// ```
/// use courier_application::variable_resolver::resolve;
/// use courier_domain::VariableValueMap;
///
/// let mut values = VariableValueMap::new();
/// values.insert("host".to_string(), "localhost".to_string());
/// assert_eq!(resolve("http://{{host}}/{{gone}}", &values), "http://localhost/");
/// ```
#[must_use]
pub fn resolve(template: &str, values: &VariableValueMap) -> String {
    resolve_detailed(template, values).resolved
}

/// Resolves like [`resolve`] and also reports the ids that had no value.
#[must_use]
pub fn resolve_detailed(template: &str, values: &VariableValueMap) -> ResolutionResult {
    let placeholders = parse_placeholders(template);
    if placeholders.is_empty() {
        return ResolutionResult {
            resolved: template.to_string(),
            missing: Vec::new(),
        };
    }

    let mut resolved = String::with_capacity(template.len());
    let mut missing = Vec::new();
    let mut last_end = 0;

    for placeholder in &placeholders {
        resolved.push_str(&template[last_end..placeholder.span.start]);
        match values.get(&placeholder.id) {
            Some(value) => resolved.push_str(value),
            None => {
                if !missing.contains(&placeholder.id) {
                    missing.push(placeholder.id.clone());
                }
            }
        }
        last_end = placeholder.span.end;
    }
    resolved.push_str(&template[last_end..]);

    ResolutionResult { resolved, missing }
}
