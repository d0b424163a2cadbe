//! Flow control

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::actions::Action;
use crate::actions::params::template;
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;

/// Pauses the run for `duration` milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct WaitAction {
    #[serde(default, deserialize_with = "template")]
    duration: String,
}

#[async_trait]
impl Action for WaitAction {
    fn type_tag(&self) -> &'static str {
        "wait"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let duration = ctx.resolve_template(&self.duration).await?;
        let millis = duration.trim().parse::<u64>().map_err(|_| {
            ExecutionError::user(format!("'{duration}' is not a valid duration in milliseconds"))
        })?;

        debug!(millis, "waiting");
        tokio::select! {
            () = tokio::time::sleep(Duration::from_millis(millis)) => Ok(None),
            () = ctx.cancellation().cancelled() => Err(ExecutionError::Cancelled),
        }
    }
}

/// Ends the run silently.
#[derive(Debug, Clone, Deserialize)]
pub struct AbortAction {}

#[async_trait]
impl Action for AbortAction {
    fn type_tag(&self) -> &'static str {
        "abort"
    }

    async fn execute(&self, _ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        Err(ExecutionError::Cancelled)
    }
}
