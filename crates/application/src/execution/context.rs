//! Execution context
//!
//! The per-run bundle of capabilities handed to actions and variable
//! resolvers. Created by the runner, borrowed by everything else.

use std::sync::Arc;

use courier_domain::generate_id;
use tracing::debug;

use crate::error::{ExecutionError, ExecutionResult};
use crate::ports::{
    CancellationReceiver, Clock, Prompt, PromptResult, PromptValue, UiAttachment, UiProvider,
};
use crate::variable_resolver::{extract_variable_ids, resolve};
use crate::variables::VariableManager;

/// Capabilities of one shortcut run.
pub struct ExecutionContext {
    session_id: String,
    variables: VariableManager,
    ui: Arc<dyn UiProvider>,
    cancellation: CancellationReceiver,
    clock: Arc<dyn Clock>,
}

impl ExecutionContext {
    /// Creates a context with a fresh session id.
    #[must_use]
    pub fn new(
        variables: VariableManager,
        ui: Arc<dyn UiProvider>,
        cancellation: CancellationReceiver,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session_id: generate_id(),
            variables,
            ui,
            cancellation,
            clock,
        }
    }

    /// Identifier of this run, used to name stored responses.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The run's variable values.
    #[must_use]
    pub const fn variables(&self) -> &VariableManager {
        &self.variables
    }

    /// The run's cancellation signal.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationReceiver {
        &self.cancellation
    }

    /// The clock used for default picker values and timestamps.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Returns true once the run has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Returns the UI currently in the foreground.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::NoUiAvailable` naming `purpose` when nothing
    /// is attached.
    pub fn ui(&self, purpose: &'static str) -> ExecutionResult<Arc<dyn UiAttachment>> {
        self.ui
            .current()
            .ok_or(ExecutionError::NoUiAvailable(purpose))
    }

    /// Shows `prompt` and waits for the answer or for the run to be
    /// cancelled, whichever comes first.
    ///
    /// # Errors
    ///
    /// A dismissed prompt or a cancelled run yields
    /// `ExecutionError::Cancelled`; a UI failure yields a user error.
    pub async fn prompt(&self, prompt: Prompt) -> ExecutionResult<PromptValue> {
        if self.is_cancelled() {
            return Err(ExecutionError::Cancelled);
        }
        let kind = prompt.kind_name();
        let ui = self.ui(kind)?;

        debug!(prompt = kind, "waiting for user");
        tokio::select! {
            result = ui.show(prompt) => match result {
                PromptResult::Value(value) => Ok(value),
                PromptResult::Cancelled => {
                    debug!(prompt = kind, "prompt dismissed");
                    Err(ExecutionError::Cancelled)
                }
                PromptResult::Error(message) => Err(ExecutionError::User(message)),
            },
            () = self.cancellation.cancelled() => Err(ExecutionError::Cancelled),
        }
    }

    /// Returns the value of variable `id`, resolving it on first access.
    ///
    /// # Errors
    ///
    /// See [`VariableManager::get_value`].
    pub async fn variable_value(&self, id: &str) -> ExecutionResult<String> {
        self.variables.get_value(self, id).await
    }

    /// Resolves the variables referenced by `template`, then substitutes
    /// them.
    ///
    /// # Errors
    ///
    /// Fails if any referenced variable fails or is cancelled.
    pub async fn resolve_template(&self, template: &str) -> ExecutionResult<String> {
        let ids = extract_variable_ids(template);
        if ids.is_empty() {
            return Ok(template.to_string());
        }
        let values = self.variables.resolve_all(self, &ids).await?;
        Ok(resolve(template, &values))
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("session_id", &self.session_id)
            .field("variables", &self.variables)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
