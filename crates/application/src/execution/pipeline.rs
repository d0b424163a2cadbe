//! Action pipeline
//!
//! Runs an action list strictly in order and reports its progress through a
//! watch channel: `Pending`, then `Running` for each action, then one of
//! `Completed`, `Failed` or `Cancelled`.

use tokio::sync::watch;
use tracing::{debug, warn};

use super::context::ExecutionContext;
use super::outcome::{RunOutcome, RunOutput, RunState};
use crate::actions::{Action, FailurePolicy};
use crate::error::ExecutionError;

/// Drives one action list to a terminal outcome.
#[derive(Debug)]
pub struct ActionPipeline {
    state: watch::Sender<RunState>,
}

impl Default for ActionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionPipeline {
    /// Creates a pipeline in the `Pending` state.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(RunState::Pending);
        Self { state }
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state.borrow().clone()
    }

    /// Runs `actions` in order.
    ///
    /// Each action starts only after the previous one finished. Errors of
    /// actions with [`FailurePolicy::Continue`] are logged and skipped; any
    /// other error ends the run. Cancellation ends it at once, without
    /// undoing what earlier actions did. The output of the last action that
    /// produced one becomes the run's [`RunOutput::Text`].
    pub async fn run(&self, actions: &[Box<dyn Action>], ctx: &ExecutionContext) -> RunOutcome {
        let mut output = None;

        for (index, action) in actions.iter().enumerate() {
            if ctx.is_cancelled() {
                return self.cancelled();
            }

            let type_tag = action.type_tag();
            self.transition(RunState::Running { index, type_tag });

            match action.execute(ctx).await {
                Ok(Some(text)) => output = Some(text),
                Ok(None) => {}
                Err(ExecutionError::Cancelled) => return self.cancelled(),
                Err(error) if action.failure_policy() == FailurePolicy::Continue => {
                    if error.is_recoverable() {
                        debug!(index, action = type_tag, %error, "skipped best-effort action");
                    } else {
                        warn!(index, action = type_tag, %error, "best-effort action failed");
                    }
                }
                Err(error) => {
                    warn!(index, action = type_tag, %error, "action failed");
                    self.transition(RunState::Failed {
                        message: error.to_string(),
                    });
                    return RunOutcome::Failed(error);
                }
            }
        }

        self.transition(RunState::Completed);
        RunOutcome::Completed(output.map_or(RunOutput::Empty, RunOutput::Text))
    }

    fn cancelled(&self) -> RunOutcome {
        self.transition(RunState::Cancelled);
        RunOutcome::Cancelled
    }

    fn transition(&self, state: RunState) {
        debug!(?state, "pipeline transition");
        self.state.send_replace(state);
    }
}
