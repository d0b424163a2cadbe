//! Action scripts.
//!
//! A script is one function call per line, using the aliases the action
//! registry publishes:
//! ```text
//! // ask, then show the answer
//! prompt("Name?", "")
//! showDialog("Hello {{name}}", "Greeting")
//! wait(500)
//! ```
//! Arguments map positionally onto the alias parameters. Quoted arguments
//! are strings; bare `true`, `false` and numbers keep their JSON type and a
//! bare `null` leaves the parameter unset. `//` and `#` start comments.

use courier_application::ActionTypeRegistry;
use courier_domain::{ActionAlias, ActionData, ActionRecord};
use serde_json::Value;
use thiserror::Error;

/// Error type for script parsing and rendering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptParseError {
    /// The line is not a function call.
    #[error("Invalid syntax at line {line}: {message}")]
    InvalidSyntax {
        /// The line number where the error occurred.
        line: usize,
        /// The error message.
        message: String,
    },
    /// No action kind publishes this function name.
    #[error("Unknown function at line {line}: {name}")]
    UnknownFunction {
        /// The line number where the error occurred.
        line: usize,
        /// The function name.
        name: String,
    },
    /// More arguments than the alias has parameters.
    #[error("{function} takes {expected} argument(s) but {found} were given (line {line})")]
    TooManyArguments {
        /// The line number where the error occurred.
        line: usize,
        /// The function name.
        function: String,
        /// Number of parameters of the alias.
        expected: usize,
        /// Number of arguments given.
        found: usize,
    },
    /// A bare argument that is not a literal.
    #[error("Invalid argument for {function} at line {line}: {message}")]
    InvalidArgument {
        /// The line number where the error occurred.
        line: usize,
        /// The function name.
        function: String,
        /// The error message.
        message: String,
    },
    /// A record that cannot be written as a call.
    #[error("Cannot render action {type_tag}: {message}")]
    Unrenderable {
        /// Tag of the record.
        type_tag: String,
        /// The error message.
        message: String,
    },
}

/// Parses a script into stored action records.
///
/// # Errors
///
/// Returns an error for malformed lines, unknown function names and
/// arguments that do not fit the alias.
pub fn parse_script(
    script: &str,
    registry: &ActionTypeRegistry,
) -> Result<Vec<ActionRecord>, ScriptParseError> {
    let mut records = Vec::new();

    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }
        records.push(parse_line(line, index + 1, registry)?);
    }

    Ok(records)
}

fn parse_line(
    line: &str,
    line_num: usize,
    registry: &ActionTypeRegistry,
) -> Result<ActionRecord, ScriptParseError> {
    let line = line.strip_suffix(';').unwrap_or(line).trim_end();

    let Some(paren_pos) = line.find('(') else {
        return Err(ScriptParseError::InvalidSyntax {
            line: line_num,
            message: "Expected '(' after function name".to_string(),
        });
    };
    let name = line[..paren_pos].trim();
    let Some(args_content) = line[paren_pos + 1..].strip_suffix(')') else {
        return Err(ScriptParseError::InvalidSyntax {
            line: line_num,
            message: "Missing closing ')'".to_string(),
        });
    };

    let descriptor =
        registry
            .find_by_function_name(name)
            .ok_or_else(|| ScriptParseError::UnknownFunction {
                line: line_num,
                name: name.to_string(),
            })?;
    let alias = descriptor.alias;

    let args = split_arguments(args_content).map_err(|message| ScriptParseError::InvalidSyntax {
        line: line_num,
        message,
    })?;
    if args.len() > alias.parameters.len() {
        return Err(ScriptParseError::TooManyArguments {
            line: line_num,
            function: name.to_string(),
            expected: alias.parameters.len(),
            found: args.len(),
        });
    }

    let mut data = ActionData::new();
    for (parameter, arg) in alias.parameters.iter().zip(args) {
        let value = arg
            .into_value()
            .map_err(|message| ScriptParseError::InvalidArgument {
                line: line_num,
                function: name.to_string(),
                message,
            })?;
        if !value.is_null() {
            data.insert((*parameter).to_string(), value);
        }
    }

    Ok(ActionRecord {
        type_tag: descriptor.type_tag.to_string(),
        data,
    })
}

#[derive(Debug, PartialEq)]
struct Argument {
    text: String,
    quoted: bool,
}

impl Argument {
    fn into_value(self) -> Result<Value, String> {
        if self.quoted {
            return Ok(Value::String(self.text));
        }
        match self.text.as_str() {
            "null" => Ok(Value::Null),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            text => serde_json::from_str::<serde_json::Number>(text)
                .map(Value::Number)
                .map_err(|_| format!("'{text}' is not a string, number or boolean")),
        }
    }
}

fn split_arguments(args_str: &str) -> Result<Vec<Argument>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut quote: Option<char> = None;
    let mut escape_next = false;

    for ch in args_str.chars() {
        if escape_next {
            current.push(match ch {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escape_next = false;
            continue;
        }

        match (ch, quote) {
            ('\\', Some(_)) => escape_next = true,
            ('"' | '\'', None) => {
                if quoted {
                    return Err("Missing ',' between quoted arguments".to_string());
                }
                if !current.trim().is_empty() {
                    return Err(format!("Unexpected quote after '{}'", current.trim()));
                }
                current.clear();
                quote = Some(ch);
                quoted = true;
            }
            (c, Some(open)) if c == open => quote = None,
            (',', None) => {
                args.push(finish(&mut current, quoted));
                quoted = false;
            }
            (c, None) if quoted => {
                if !c.is_whitespace() {
                    return Err(format!("Unexpected '{c}' after a quoted argument"));
                }
            }
            _ => current.push(ch),
        }
    }

    if quote.is_some() {
        return Err("Unterminated string".to_string());
    }
    if quoted || !current.trim().is_empty() || !args.is_empty() {
        args.push(finish(&mut current, quoted));
    }
    Ok(args)
}

fn finish(current: &mut String, quoted: bool) -> Argument {
    let raw = std::mem::take(current);
    let text = if quoted { raw } else { raw.trim().to_string() };
    Argument { text, quoted }
}

/// Writes records as a script, one call per line.
///
/// Trailing unset parameters are left out; unset parameters before a set
/// one are written as `null`.
///
/// # Errors
///
/// Returns `ScriptParseError::Unrenderable` for unknown tags, data keys
/// outside the alias and values that are neither strings, numbers nor
/// booleans.
pub fn render_script(
    records: &[ActionRecord],
    registry: &ActionTypeRegistry,
) -> Result<String, ScriptParseError> {
    let mut script = String::new();
    for record in records {
        let alias = registry
            .alias(&record.type_tag)
            .ok_or_else(|| ScriptParseError::Unrenderable {
                type_tag: record.type_tag.clone(),
                message: "unknown action type".to_string(),
            })?;
        script.push_str(&render_call(record, alias)?);
        script.push('\n');
    }
    Ok(script)
}

fn render_call(record: &ActionRecord, alias: ActionAlias) -> Result<String, ScriptParseError> {
    let unrenderable = |message: String| ScriptParseError::Unrenderable {
        type_tag: record.type_tag.clone(),
        message,
    };

    if let Some(key) = record
        .data
        .keys()
        .find(|key| !alias.parameters.contains(&key.as_str()))
    {
        return Err(unrenderable(format!("'{key}' is not a parameter of {}", alias.function_name)));
    }

    let used = alias
        .parameters
        .iter()
        .rposition(|p| record.data.get(*p).is_some_and(|v| !v.is_null()))
        .map_or(0, |last| last + 1);

    let mut args = Vec::with_capacity(used);
    for parameter in &alias.parameters[..used] {
        let rendered = match record.data.get(*parameter) {
            None | Some(Value::Null) => "null".to_string(),
            Some(Value::String(text)) => quote(text),
            Some(Value::Bool(flag)) => flag.to_string(),
            Some(Value::Number(number)) => number.to_string(),
            Some(_) => {
                return Err(unrenderable(format!(
                    "'{parameter}' must be a string, number or boolean"
                )));
            }
        };
        args.push(rendered);
    }

    Ok(format!("{}({})", alias.function_name, args.join(", ")))
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
