//! Reading and overriding variable values

use async_trait::async_trait;
use serde::Deserialize;

use crate::actions::Action;
use crate::actions::params::template;
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;

/// Resolves the referenced id or key to a variable id.
async fn target(ctx: &ExecutionContext, reference: &str) -> ExecutionResult<String> {
    let reference = ctx.resolve_template(reference).await?;
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ExecutionError::user("no variable given"));
    }
    ctx.variables().lookup_id(reference).await
}

/// Overrides a variable's value for the rest of the run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetVariableAction {
    #[serde(default, deserialize_with = "template")]
    variable_id: String,
    #[serde(default, deserialize_with = "template")]
    value: String,
}

#[async_trait]
impl Action for SetVariableAction {
    fn type_tag(&self) -> &'static str {
        "set_variable"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let id = target(ctx, &self.variable_id).await?;
        let value = ctx.resolve_template(&self.value).await?;
        ctx.variables().set_value(&id, value);
        Ok(None)
    }
}

/// Outputs a variable's value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVariableAction {
    #[serde(default, deserialize_with = "template")]
    variable_id: String,
}

#[async_trait]
impl Action for GetVariableAction {
    fn type_tag(&self) -> &'static str {
        "get_variable"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let id = target(ctx, &self.variable_id).await?;
        ctx.variable_value(&id).await.map(Some)
    }
}
