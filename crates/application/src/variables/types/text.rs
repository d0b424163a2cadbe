//! Text, password and number input

use async_trait::async_trait;
use courier_domain::Variable;

use super::{prompt_title, unexpected_answer};
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::{Prompt, PromptValue, TextInputKind};
use crate::variables::{ResolvedValue, VariableType};

/// Asks the user to type a value.
#[derive(Debug, Clone, Copy)]
pub struct TextType {
    input: TextInputKind,
}

impl TextType {
    /// Plain text input.
    #[must_use]
    pub const fn text() -> Self {
        Self {
            input: TextInputKind::Text,
        }
    }

    /// Masked input.
    #[must_use]
    pub const fn password() -> Self {
        Self {
            input: TextInputKind::Password,
        }
    }

    /// Numeric input, validated after entry.
    #[must_use]
    pub const fn number() -> Self {
        Self {
            input: TextInputKind::Number,
        }
    }
}

#[async_trait]
impl VariableType for TextType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let answer = ctx
            .prompt(Prompt::TextInput {
                title: prompt_title(variable),
                message: variable.message.clone(),
                input: self.input,
                prefill: variable.remembered_value().unwrap_or_default().to_string(),
            })
            .await?;
        let PromptValue::Text(text) = answer else {
            return Err(unexpected_answer(variable, &answer));
        };

        let value = match self.input {
            TextInputKind::Number => normalize_number(&text)?,
            TextInputKind::Text | TextInputKind::Password => text,
        };
        Ok(ResolvedValue::new(value))
    }
}

/// Validates numeric input. A trailing decimal point is dropped.
fn normalize_number(input: &str) -> ExecutionResult<String> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(trimmed.to_string()),
        _ => Err(ExecutionError::user(format!("'{input}' is not a valid number"))),
    }
}
