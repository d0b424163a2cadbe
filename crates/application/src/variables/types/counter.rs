//! Generated values: counters and UUIDs

use async_trait::async_trait;
use courier_domain::Variable;

use crate::error::ExecutionResult;
use crate::execution::ExecutionContext;
use crate::variables::{ResolvedValue, VariableType};

/// Counter increased on every resolution, starting at 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementType;

#[async_trait]
impl VariableType for IncrementType {
    async fn resolve(
        &self,
        variable: &Variable,
        _ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let current = variable
            .value
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(0);
        Ok(ResolvedValue::new(current.saturating_add(1).to_string()))
    }

    fn always_persists(&self) -> bool {
        true
    }
}

/// Fresh random UUID on every run.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidType;

#[async_trait]
impl VariableType for UuidType {
    async fn resolve(
        &self,
        _variable: &Variable,
        _ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        Ok(ResolvedValue::new(uuid::Uuid::new_v4().to_string()))
    }
}
