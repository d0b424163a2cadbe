//! Courier Application - Shortcut execution engine
//!
//! This crate runs shortcuts: it resolves `{{id}}` placeholders from
//! user-defined variables, executes the prepare, success and failure action
//! lists, and sends the request through the [`ports`] implemented by the
//! infrastructure layer.

pub mod actions;
pub mod error;
pub mod execution;
pub mod ports;
pub mod variable_resolver;
pub mod variables;

pub use actions::{Action, ActionBuildError, ActionTypeDescriptor, ActionTypeRegistry, FailurePolicy};
pub use error::{ExecutionError, ExecutionResult};
pub use execution::{
    ActionPipeline, ExecutionContext, RunOutcome, RunOutput, RunState, ShortcutRunner,
};
pub use variables::{ResolvedValue, VariableManager, VariableType, VariableTypeRegistry};
