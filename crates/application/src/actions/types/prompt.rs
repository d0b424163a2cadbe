//! Prompts whose answer becomes the action output

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::actions::Action;
use crate::actions::params::template;
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::{Prompt, PromptValue, TextInputKind};
use crate::variables::date_format::{DEFAULT_DATE_PATTERN, DEFAULT_TIME_PATTERN, DatePattern};

fn unexpected(answer: &PromptValue) -> ExecutionError {
    ExecutionError::user(format!("unexpected answer {answer:?}"))
}

/// Compiles `format`, or `default` when empty.
fn compile(format: &str, default: &str) -> ExecutionResult<DatePattern> {
    let source = if format.trim().is_empty() { default } else { format };
    DatePattern::compile(source).map_err(|e| ExecutionError::user(e.to_string()))
}

/// Asks for free text.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptAction {
    #[serde(default, deserialize_with = "template")]
    message: String,
    #[serde(default, deserialize_with = "template")]
    prefill: String,
}

#[async_trait]
impl Action for PromptAction {
    fn type_tag(&self) -> &'static str {
        "prompt"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let message = ctx.resolve_template(&self.message).await?;
        let prefill = ctx.resolve_template(&self.prefill).await?;
        match ctx
            .prompt(Prompt::TextInput {
                title: String::new(),
                message,
                input: TextInputKind::Text,
                prefill,
            })
            .await?
        {
            PromptValue::Text(text) => Ok(Some(text)),
            other => Err(unexpected(&other)),
        }
    }
}

/// Asks for a time and outputs it in `format`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTimeAction {
    #[serde(default, deserialize_with = "template")]
    format: String,
    #[serde(default, deserialize_with = "template")]
    initial_time: String,
}

#[async_trait]
impl Action for PromptTimeAction {
    fn type_tag(&self) -> &'static str {
        "prompt_time"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let format = ctx.resolve_template(&self.format).await?;
        let pattern = compile(&format, DEFAULT_TIME_PATTERN)?;
        let initial = ctx.resolve_template(&self.initial_time).await?;
        let initial = parse_time(&initial).unwrap_or_else(|| ctx.clock().now().time());

        match ctx
            .prompt(Prompt::Time {
                title: String::new(),
                initial,
            })
            .await?
        {
            PromptValue::Time(time) => pattern
                .format_time(time)
                .map(Some)
                .map_err(|_| ExecutionError::user("Invalid time format")),
            other => Err(unexpected(&other)),
        }
    }
}

/// Asks for a date and outputs it in `format`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDateAction {
    #[serde(default, deserialize_with = "template")]
    format: String,
    #[serde(default, deserialize_with = "template")]
    initial_date: String,
}

#[async_trait]
impl Action for PromptDateAction {
    fn type_tag(&self) -> &'static str {
        "prompt_date"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let format = ctx.resolve_template(&self.format).await?;
        let pattern = compile(&format, DEFAULT_DATE_PATTERN)?;
        let initial = ctx.resolve_template(&self.initial_date).await?;
        let initial = initial
            .trim()
            .parse::<NaiveDate>()
            .unwrap_or_else(|_| ctx.clock().now().date_naive());

        match ctx
            .prompt(Prompt::Date {
                title: String::new(),
                initial,
            })
            .await?
        {
            PromptValue::Date(date) => pattern
                .format_date(date)
                .map(Some)
                .map_err(|_| ExecutionError::user("Invalid date format")),
            other => Err(unexpected(&other)),
        }
    }
}

/// Accepts `HH:mm` and `HH:mm:ss`.
fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_time(" 23:59:58 "), NaiveTime::from_hms_opt(23, 59, 58));
        assert_eq!(parse_time("8h"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn test_compile_falls_back_to_default() {
        assert!(compile("", DEFAULT_TIME_PATTERN).is_ok());
        assert!(matches!(
            compile("HH:qq", DEFAULT_TIME_PATTERN),
            Err(ExecutionError::User(_))
        ));
    }
}
