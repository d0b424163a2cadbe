//! Date, time and timestamp variables
//!
//! Pickers store the picked value in ISO form so the next prompt can start
//! from it, while templates receive the value in the configured pattern.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use courier_domain::Variable;
use serde::Deserialize;

use super::{config, prompt_title, unexpected_answer};
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::{Prompt, PromptValue};
use crate::variables::date_format::{
    DEFAULT_DATE_PATTERN, DEFAULT_TIME_PATTERN, DEFAULT_TIMESTAMP_PATTERN, DatePattern,
};
use crate::variables::{ResolvedValue, VariableType};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatConfig {
    format: Option<String>,
}

/// Compiles the configured pattern before any prompt is shown.
fn pattern(variable: &Variable, default: &str) -> ExecutionResult<DatePattern> {
    let config: FormatConfig = config(variable)?;
    let source = config
        .format
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(default);
    DatePattern::compile(source).map_err(|e| ExecutionError::user(e.to_string()))
}

fn format_failed(variable: &Variable) -> ExecutionError {
    ExecutionError::user(format!(
        "Invalid date format for variable '{}'",
        variable.key
    ))
}

/// Date picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

#[async_trait]
impl VariableType for DateType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let pattern = pattern(variable, DEFAULT_DATE_PATTERN)?;
        let initial = variable
            .remembered_value()
            .and_then(|v| v.parse::<NaiveDate>().ok())
            .unwrap_or_else(|| ctx.clock().now().date_naive());

        let answer = ctx
            .prompt(Prompt::Date {
                title: prompt_title(variable),
                initial,
            })
            .await?;
        let PromptValue::Date(date) = answer else {
            return Err(unexpected_answer(variable, &answer));
        };

        let value = pattern
            .format_date(date)
            .map_err(|_| format_failed(variable))?;
        Ok(ResolvedValue::storing(value, date.to_string()))
    }
}

/// Time picker.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeType;

#[async_trait]
impl VariableType for TimeType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let pattern = pattern(variable, DEFAULT_TIME_PATTERN)?;
        let initial = variable
            .remembered_value()
            .and_then(|v| v.parse::<NaiveTime>().ok())
            .unwrap_or_else(|| ctx.clock().now().time());

        let answer = ctx
            .prompt(Prompt::Time {
                title: prompt_title(variable),
                initial,
            })
            .await?;
        let PromptValue::Time(time) = answer else {
            return Err(unexpected_answer(variable, &answer));
        };

        let value = pattern
            .format_time(time)
            .map_err(|_| format_failed(variable))?;
        Ok(ResolvedValue::storing(value, time.to_string()))
    }
}

/// Current local time, no prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampType;

#[async_trait]
impl VariableType for TimestampType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let pattern = pattern(variable, DEFAULT_TIMESTAMP_PATTERN)?;
        let now = ctx.clock().now().naive_local();
        let value = pattern.format(&now).map_err(|_| format_failed(variable))?;
        Ok(ResolvedValue::new(value))
    }
}
