//! Shortcut execution
//!
//! The [`ExecutionContext`] of a run, the [`ActionPipeline`] driving an
//! action list, and the [`ShortcutRunner`] tying them to the request.

mod context;
mod outcome;
mod pipeline;
mod runner;

pub use context::ExecutionContext;
pub use outcome::{RunOutcome, RunOutput, RunState};
pub use pipeline::ActionPipeline;
pub use runner::ShortcutRunner;
