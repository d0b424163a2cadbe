//! Placeholder parser for `{{id}}` syntax
//!
//! Finds well-formed placeholder tokens and their positions. Anything that
//! does not match the grammar is ordinary text.

use std::ops::Range;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A placeholder token found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// The referenced variable id.
    pub id: String,

    /// Byte range of the whole token, braces included.
    pub span: Range<usize>,
}

/// Returns true if `c` may appear in a placeholder id.
fn is_id_char(c: char) -> bool {
    c != '{' && c != '}' && !c.is_whitespace()
}

/// Parses a template and returns every well-formed placeholder, left to
/// right.
///
/// A token is `{{`, one or more id characters, then `}}`. Id characters
/// exclude braces and whitespace, so `{{}}`, `{{ a }}` and unterminated
/// openings are not tokens.
///
/// # Examples
///
/// ```
/// use courier_application::variable_resolver::parse_placeholders;
///
/// let tokens = parse_placeholders("{{host}}/users/{{id}}");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].id, "host");
/// assert_eq!(tokens[1].span, 15..21);
/// ```
#[must_use]
pub fn parse_placeholders(input: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find(OPEN) {
        let start = cursor + offset;
        let id_start = start + OPEN.len();
        let id_len = input[id_start..]
            .find(|c: char| !is_id_char(c))
            .unwrap_or(input.len() - id_start);
        let id_end = id_start + id_len;

        if id_len > 0 && input[id_end..].starts_with(CLOSE) {
            let end = id_end + CLOSE.len();
            placeholders.push(Placeholder {
                id: input[id_start..id_end].to_string(),
                span: start..end,
            });
            cursor = end;
        } else {
            // Not a token; the second brace may still open one.
            cursor = start + 1;
        }
    }

    placeholders
}

/// Returns the distinct variable ids referenced by `input`, in order of
/// first appearance.
#[must_use]
pub fn extract_variable_ids(input: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for placeholder in parse_placeholders(input) {
        if !ids.contains(&placeholder.id) {
            ids.push(placeholder.id);
        }
    }
    ids
}

/// Returns true if the input contains at least one placeholder token.
#[must_use]
pub fn has_placeholders(input: &str) -> bool {
    !parse_placeholders(input).is_empty()
}

/// Writes the placeholder token referencing `id`.
#[must_use]
pub fn to_placeholder(id: &str) -> String {
    format!("{OPEN}{id}{CLOSE}")
}
