//! Built-in variable kinds

mod color;
mod constant;
mod counter;
mod datetime;
mod select;
mod slider;
mod text;

pub use color::{ColorType, parse_hex_color};
pub use constant::ConstantType;
pub use counter::{IncrementType, UuidType};
pub use datetime::{DateType, TimeType, TimestampType};
pub use select::{SelectOption, SelectType, ToggleType};
pub use slider::SliderType;
pub use text::TextType;

use courier_domain::Variable;
use serde::de::DeserializeOwned;

use crate::error::{ExecutionError, ExecutionResult};
use crate::ports::PromptValue;

/// Title shown on the prompt for `variable`, falling back to its key.
fn prompt_title(variable: &Variable) -> String {
    if variable.title.trim().is_empty() {
        variable.key.clone()
    } else {
        variable.title.clone()
    }
}

/// Reads the kind-specific configuration of `variable`.
fn config<T: DeserializeOwned>(variable: &Variable) -> ExecutionResult<T> {
    variable
        .config_as()
        .map_err(|e| ExecutionError::configuration(e.to_string()))
}

fn unexpected_answer(variable: &Variable, answer: &PromptValue) -> ExecutionError {
    ExecutionError::user(format!(
        "unexpected answer {answer:?} for variable '{}'",
        variable.key
    ))
}
