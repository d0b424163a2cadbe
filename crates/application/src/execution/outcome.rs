//! Run states and outcomes

use crate::error::ExecutionError;
use crate::ports::StoredResponse;

/// Observable state of an action pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has run yet.
    Pending,
    /// The action at `index` is executing.
    Running {
        /// Position in the action list.
        index: usize,
        /// Tag of the running action.
        type_tag: &'static str,
    },
    /// Every action finished.
    Completed,
    /// An action failed and the rest were skipped.
    Failed {
        /// Message of the error that ended the run.
        message: String,
    },
    /// The run was cancelled.
    Cancelled,
}

impl RunState {
    /// Returns true for the three final states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. } | Self::Cancelled)
    }
}

/// The payload of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    /// Nothing to show.
    Empty,
    /// Text produced by the last action that returned some.
    Text(String),
    /// The stored response.
    File(StoredResponse),
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every step succeeded.
    Completed(RunOutput),
    /// A step failed; the error says why.
    Failed(ExecutionError),
    /// The user or the caller cancelled the run.
    Cancelled,
}

impl RunOutcome {
    /// Returns true if the run completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Returns true if the run failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if the run was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<ExecutionError> for RunOutcome {
    fn from(error: ExecutionError) -> Self {
        if error.is_cancellation() {
            Self::Cancelled
        } else {
            Self::Failed(error)
        }
    }
}
