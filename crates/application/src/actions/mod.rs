//! Actions
//!
//! An [`Action`] is one typed step of a shortcut. Actions are built fresh
//! for every run from stored `{type, data}` records by the
//! [`ActionTypeRegistry`] and executed in order by the
//! [`ActionPipeline`](crate::execution::ActionPipeline).

mod params;
mod registry;
pub mod types;

use std::fmt;

use async_trait::async_trait;

pub use registry::{ActionBuildError, ActionFactory, ActionTypeDescriptor, ActionTypeRegistry};

use crate::error::ExecutionResult;
use crate::execution::ExecutionContext;

/// What the pipeline does when an action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The run ends with the error.
    #[default]
    Abort,
    /// The error is logged and the next action runs.
    Continue,
}

/// An executable step.
///
/// String parameters are templates; they are resolved against the run's
/// variables when the action executes, not when it is built.
#[async_trait]
pub trait Action: Send + Sync + fmt::Debug {
    /// Stable tag of the action kind.
    fn type_tag(&self) -> &'static str;

    /// How failures of this action are handled.
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }

    /// Executes the action and returns its output text, if any.
    ///
    /// # Errors
    ///
    /// `ExecutionError::Cancelled` ends the run as cancelled; any other
    /// error is handled according to [`failure_policy`](Self::failure_policy).
    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>>;
}
