//! Shortcut runner
//!
//! Runs a shortcut end to end: prepare actions, request, response storage,
//! then success or failure actions. Every error ends up in the returned
//! [`RunOutcome`].

use std::sync::Arc;
use std::time::Instant;

use courier_domain::{EngineSettings, Header, ResolvedRequest, Shortcut, VariableValueMap};
use tracing::{debug, info, warn};

use super::context::ExecutionContext;
use super::outcome::{RunOutcome, RunOutput};
use super::pipeline::ActionPipeline;
use crate::actions::{Action, ActionTypeRegistry};
use crate::error::{ExecutionError, ExecutionResult};
use crate::ports::{
    CancellationReceiver, Clock, HttpTransport, ResponseStorage, StoredResponse, UiProvider,
    VariableRepository,
};
use crate::variable_resolver::{extract_variable_ids, resolve};
use crate::variables::{VariableManager, VariableTypeRegistry};

/// Runs shortcuts against a fixed set of collaborators.
pub struct ShortcutRunner {
    transport: Arc<dyn HttpTransport>,
    storage: Arc<dyn ResponseStorage>,
    variables: Arc<dyn VariableRepository>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
    action_types: Arc<ActionTypeRegistry>,
    variable_types: Arc<VariableTypeRegistry>,
}

struct ActionLists {
    prepare: Vec<Box<dyn Action>>,
    success: Vec<Box<dyn Action>>,
    failure: Vec<Box<dyn Action>>,
}

impl ShortcutRunner {
    /// Creates a runner with default settings and the built-in action and
    /// variable kinds.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        storage: Arc<dyn ResponseStorage>,
        variables: Arc<dyn VariableRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            storage,
            variables,
            clock,
            settings: EngineSettings::default(),
            action_types: Arc::new(ActionTypeRegistry::with_defaults()),
            variable_types: Arc::new(VariableTypeRegistry::with_defaults()),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replaces the action registry.
    #[must_use]
    pub fn with_action_types(mut self, action_types: ActionTypeRegistry) -> Self {
        self.action_types = Arc::new(action_types);
        self
    }

    /// Replaces the variable type registry.
    #[must_use]
    pub fn with_variable_types(mut self, variable_types: VariableTypeRegistry) -> Self {
        self.variable_types = Arc::new(variable_types);
        self
    }

    /// The settings in use.
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Creates the context of a new run.
    #[must_use]
    pub fn context(
        &self,
        ui: Arc<dyn UiProvider>,
        cancellation: CancellationReceiver,
    ) -> ExecutionContext {
        let variables =
            VariableManager::new(Arc::clone(&self.variables), Arc::clone(&self.variable_types));
        ExecutionContext::new(variables, ui, cancellation, Arc::clone(&self.clock))
    }

    /// Runs `shortcut` in a fresh context.
    pub async fn run(
        &self,
        shortcut: &Shortcut,
        ui: Arc<dyn UiProvider>,
        cancellation: CancellationReceiver,
    ) -> RunOutcome {
        let ctx = self.context(ui, cancellation);
        self.run_with_context(shortcut, &ctx).await
    }

    /// Runs `shortcut` in `ctx`, which may carry preset variable values.
    pub async fn run_with_context(&self, shortcut: &Shortcut, ctx: &ExecutionContext) -> RunOutcome {
        let started = Instant::now();
        info!(shortcut = %shortcut.name, session = ctx.session_id(), "running shortcut");

        let outcome = self.execute(shortcut, ctx).await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &outcome {
            RunOutcome::Failed(error) => {
                info!(shortcut = %shortcut.name, elapsed_ms, %error, "shortcut failed");
            }
            other => info!(shortcut = %shortcut.name, elapsed_ms, outcome = other.label(), "shortcut finished"),
        }
        outcome
    }

    async fn execute(&self, shortcut: &Shortcut, ctx: &ExecutionContext) -> RunOutcome {
        let actions = match self.build_actions(shortcut) {
            Ok(actions) => actions,
            Err(error) => return RunOutcome::from(error),
        };

        match ActionPipeline::new().run(&actions.prepare, ctx).await {
            RunOutcome::Completed(_) => {}
            other => return other,
        }

        match self.send(shortcut, ctx).await {
            Ok(stored) => match ActionPipeline::new().run(&actions.success, ctx).await {
                RunOutcome::Completed(RunOutput::Empty) => {
                    RunOutcome::Completed(RunOutput::File(stored))
                }
                other => other,
            },
            Err(ExecutionError::Cancelled) => RunOutcome::Cancelled,
            Err(error) => {
                warn!(shortcut = %shortcut.name, %error, "request failed");
                if let RunOutcome::Failed(failure) =
                    ActionPipeline::new().run(&actions.failure, ctx).await
                {
                    warn!(%failure, "failure action failed");
                }
                RunOutcome::Failed(error)
            }
        }
    }

    fn build_actions(&self, shortcut: &Shortcut) -> ExecutionResult<ActionLists> {
        Ok(ActionLists {
            prepare: self.action_types.build_all(&shortcut.prepare_actions)?,
            success: self.action_types.build_all(&shortcut.success_actions)?,
            failure: self.action_types.build_all(&shortcut.failure_actions)?,
        })
    }

    /// Resolves every variable the request templates reference, then builds
    /// the request from that one snapshot.
    ///
    /// # Errors
    ///
    /// Fails if a variable fails or is cancelled.
    pub async fn build_request(
        &self,
        shortcut: &Shortcut,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedRequest> {
        let mut ids: Vec<String> = Vec::new();
        for template in shortcut.request_templates() {
            for id in extract_variable_ids(template) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        let values = ctx.variables().resolve_all(ctx, &ids).await?;
        Ok(self.assemble(shortcut, &values))
    }

    fn assemble(&self, shortcut: &Shortcut, values: &VariableValueMap) -> ResolvedRequest {
        let headers = shortcut
            .headers
            .iter()
            .map(|h| Header::new(resolve(&h.name, values).trim(), resolve(&h.value, values)))
            .filter(|h| !h.name.is_empty())
            .collect();
        let body = if shortcut.method.sends_body() {
            resolve(&shortcut.body, values)
        } else {
            String::new()
        };

        ResolvedRequest {
            method: shortcut.method,
            url: resolve(&shortcut.url, values).trim().to_string(),
            headers,
            body,
            content_type: shortcut.content_type.clone(),
            timeout: self.settings.timeout_for(shortcut.timeout_ms),
        }
    }

    async fn send(&self, shortcut: &Shortcut, ctx: &ExecutionContext) -> ExecutionResult<StoredResponse> {
        let request = self.build_request(shortcut, ctx).await?;
        request.validate()?;

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = tokio::select! {
            response = self.transport.execute(&request) => response?,
            () = ctx.cancellation().cancelled() => return Err(ExecutionError::Cancelled),
        };
        debug!(status = response.status, "response received");

        let stored = tokio::select! {
            stored = self.storage.store(
                ctx.session_id(),
                response,
                shortcut.response.finish_normally_on_timeout,
            ) => stored?,
            () = ctx.cancellation().cancelled() => return Err(ExecutionError::Cancelled),
        };
        if stored.truncated {
            warn!(path = %stored.path.display(), "response body truncated by timeout");
        }

        if stored.is_error_status() {
            return Err(ExecutionError::HttpStatus {
                status: stored.status,
                response: stored,
            });
        }
        Ok(stored)
    }
}

impl std::fmt::Debug for ShortcutRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRunner")
            .field("settings", &self.settings)
            .field("action_types", &self.action_types)
            .field("variable_types", &self.variable_types)
            .finish_non_exhaustive()
    }
}
