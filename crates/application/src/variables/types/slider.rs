//! Numeric range input

use async_trait::async_trait;
use courier_domain::Variable;
use serde::Deserialize;

use super::{config, prompt_title, unexpected_answer};
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::{Prompt, PromptValue};
use crate::variables::{ResolvedValue, VariableType};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SliderConfig {
    min: f64,
    max: f64,
    step: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

impl SliderConfig {
    /// Snaps `value` to the closest step inside the range.
    fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        (steps.mul_add(self.step, self.min)).clamp(self.min, self.max)
    }

    /// Number of decimals needed to show a value on this step grid.
    fn decimals(&self) -> usize {
        let step = self.step.to_string();
        step.split_once('.').map_or(0, |(_, fraction)| fraction.len())
    }

    fn format(&self, value: f64) -> String {
        format!("{:.*}", self.decimals(), self.snap(value))
    }
}

/// Picks a number from a range.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderType;

#[async_trait]
impl VariableType for SliderType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let slider: SliderConfig = config(variable)?;
        if !(slider.step > 0.0 && slider.max > slider.min) {
            return Err(ExecutionError::configuration(format!(
                "slider '{}' needs max > min and a positive step",
                variable.key
            )));
        }

        let initial = variable
            .remembered_value()
            .and_then(|v| v.parse::<f64>().ok())
            .map_or(slider.min, |v| slider.snap(v));

        let answer = ctx
            .prompt(Prompt::Slider {
                title: prompt_title(variable),
                min: slider.min,
                max: slider.max,
                step: slider.step,
                initial,
            })
            .await?;
        let PromptValue::Number(number) = answer else {
            return Err(unexpected_answer(variable, &answer));
        };

        Ok(ResolvedValue::new(slider.format(number)))
    }
}
