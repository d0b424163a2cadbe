use async_trait::async_trait;
use courier_domain::Variable;

use crate::error::ExecutionResult;
use crate::execution::ExecutionContext;
use crate::variables::{ResolvedValue, VariableType};

/// Returns the stored value; empty when none is stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantType;

#[async_trait]
impl VariableType for ConstantType {
    async fn resolve(
        &self,
        variable: &Variable,
        _ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        Ok(ResolvedValue::new(
            variable.value.clone().unwrap_or_default(),
        ))
    }
}
