//! Placeholder resolution
//!
//! Parsing and substitution of `{{id}}` tokens in request and action
//! templates. Both are pure; variable values are obtained by the
//! [`VariableManager`](crate::variables::VariableManager).

pub mod engine;
pub mod parser;

pub use engine::{ResolutionResult, resolve, resolve_detailed};
pub use parser::{
    Placeholder, extract_variable_ids, has_placeholders, parse_placeholders, to_placeholder,
};
pub use courier_domain::is_valid_key as is_valid_variable_key;
