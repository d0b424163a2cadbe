//! Option lists: select menus and toggles

use async_trait::async_trait;
use courier_domain::Variable;
use serde::Deserialize;

use super::{config, prompt_title, unexpected_answer};
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::{Prompt, PromptValue};
use crate::variables::{ResolvedValue, VariableType};

/// One entry of an option list.
///
/// Stored either as a plain string or as `{label, value}`; a missing value
/// falls back to the label and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "StoredOption")]
pub struct SelectOption {
    /// Text shown to the user.
    pub label: String,
    /// Text substituted into templates.
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOption {
    Plain(String),
    Labeled {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        value: Option<String>,
    },
}

impl From<StoredOption> for SelectOption {
    fn from(stored: StoredOption) -> Self {
        match stored {
            StoredOption::Plain(text) => Self {
                label: text.clone(),
                value: text,
            },
            StoredOption::Labeled { label, value } => {
                let value = value.or_else(|| label.clone()).unwrap_or_default();
                let label = label.filter(|l| !l.is_empty()).unwrap_or_else(|| value.clone());
                Self { label, value }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SelectConfig {
    options: Vec<SelectOption>,
    multi_select: bool,
    separator: String,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            multi_select: false,
            separator: ",".to_string(),
        }
    }
}

impl SelectConfig {
    /// Joins the values of the chosen options in list order. Out of range
    /// and repeated indices are ignored.
    fn join(&self, mut chosen: Vec<usize>) -> String {
        chosen.sort_unstable();
        chosen.dedup();
        chosen
            .into_iter()
            .filter_map(|index| self.options.get(index))
            .map(|option| option.value.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

fn no_options(variable: &Variable) -> ExecutionError {
    ExecutionError::configuration(format!("variable '{}' has no options", variable.key))
}

/// Options menu, single or multiple choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectType;

#[async_trait]
impl VariableType for SelectType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let select: SelectConfig = config(variable)?;
        if select.options.is_empty() {
            return Err(no_options(variable));
        }

        let answer = ctx
            .prompt(Prompt::Select {
                title: prompt_title(variable),
                options: select.options.iter().map(|o| o.label.clone()).collect(),
                multi_select: select.multi_select,
            })
            .await?;
        let PromptValue::Selection(mut chosen) = answer else {
            return Err(unexpected_answer(variable, &answer));
        };
        if !select.multi_select {
            chosen.truncate(1);
        }

        Ok(ResolvedValue::new(select.join(chosen)))
    }
}

/// Cycles through its options, one per resolution. The stored value is the
/// index of the option emitted next.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleType;

#[async_trait]
impl VariableType for ToggleType {
    async fn resolve(
        &self,
        variable: &Variable,
        _ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let toggle: SelectConfig = config(variable)?;
        let count = toggle.options.len();
        if count == 0 {
            return Err(no_options(variable));
        }

        let index = variable
            .value
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
            % count;
        let value = toggle.options[index].value.clone();
        Ok(ResolvedValue::storing(value, ((index + 1) % count).to_string()))
    }

    fn always_persists(&self) -> bool {
        true
    }
}
