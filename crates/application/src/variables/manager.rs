//! Variable manager
//!
//! Owns the value map of one run. Every variable is resolved at most once
//! per run; later references read the cached value.

use std::sync::Arc;

use courier_domain::VariableValueMap;
use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::registry::VariableTypeRegistry;
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::VariableRepository;

/// Per-run variable values, resolved lazily.
pub struct VariableManager {
    repository: Arc<dyn VariableRepository>,
    types: Arc<VariableTypeRegistry>,
    values: Mutex<VariableValueMap>,
    writes: Mutex<JoinSet<()>>,
}

impl VariableManager {
    /// Creates a manager with an empty value map.
    #[must_use]
    pub fn new(repository: Arc<dyn VariableRepository>, types: Arc<VariableTypeRegistry>) -> Self {
        Self {
            repository,
            types,
            values: Mutex::new(VariableValueMap::new()),
            writes: Mutex::new(JoinSet::new()),
        }
    }

    /// Seeds the value map. Seeded ids are never resolved through their type.
    #[must_use]
    pub fn with_values(self, values: VariableValueMap) -> Self {
        self.values.lock().extend(values);
        self
    }

    /// Returns the value of variable `id`, resolving it on first access.
    ///
    /// A variable that does not exist resolves to the empty string.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Cancelled` if the user dismissed a prompt,
    /// and user, configuration or repository errors otherwise. Nothing is
    /// cached on error.
    pub async fn get_value(&self, ctx: &ExecutionContext, id: &str) -> ExecutionResult<String> {
        let cached = self.values.lock().get(id).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }

        let Some(variable) = self.repository.get_variable(id).await? else {
            debug!(variable_id = id, "variable not found, using empty value");
            self.set_value(id, "");
            return Ok(String::new());
        };

        let variable_type = self.types.get(variable.kind).ok_or_else(|| {
            ExecutionError::configuration(format!(
                "no resolver registered for variable kind '{}'",
                variable.kind
            ))
        })?;

        debug!(key = %variable.key, kind = %variable.kind, "resolving variable");
        let resolved = variable_type.resolve(&variable, ctx).await?;
        self.set_value(id, resolved.value.clone());

        if variable.remember_value || variable_type.always_persists() {
            self.persist(variable.id, resolved.stored_form().to_string());
        }
        Ok(resolved.value)
    }

    /// Resolves every id in `ids` and returns a snapshot of all values.
    ///
    /// # Errors
    ///
    /// Stops at the first variable that fails or is cancelled.
    pub async fn resolve_all(
        &self,
        ctx: &ExecutionContext,
        ids: &[String],
    ) -> ExecutionResult<VariableValueMap> {
        for id in ids {
            self.get_value(ctx, id).await?;
        }
        Ok(self.values())
    }

    /// Overrides the run value of `id`. Nothing is persisted.
    pub fn set_value(&self, id: &str, value: impl Into<String>) {
        self.values.lock().insert(id.to_string(), value.into());
    }

    /// Returns a snapshot of the values resolved so far.
    #[must_use]
    pub fn values(&self) -> VariableValueMap {
        self.values.lock().clone()
    }

    /// Returns true if `id` already has a value in this run.
    #[must_use]
    pub fn is_resolved(&self, id: &str) -> bool {
        self.values.lock().contains_key(id)
    }

    /// Maps a reference written by a user, either an id or a key, to the
    /// variable id. Unknown references are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn lookup_id(&self, id_or_key: &str) -> ExecutionResult<String> {
        if self.is_resolved(id_or_key) {
            return Ok(id_or_key.to_string());
        }
        Ok(self
            .repository
            .find(id_or_key)
            .await?
            .map_or_else(|| id_or_key.to_string(), |variable| variable.id))
    }

    /// Waits for every remembered value written so far to reach the store.
    ///
    /// Runs never wait on these writes; call this before the process exits.
    pub async fn flush_writes(&self) {
        let mut writes = std::mem::take(&mut *self.writes.lock());
        while let Some(joined) = writes.join_next().await {
            if let Err(error) = joined {
                warn!(%error, "variable write task did not finish");
            }
        }
    }

    /// Writes a remembered value without blocking the run. Last write wins;
    /// failures are logged.
    fn persist(&self, id: String, value: String) {
        let repository = Arc::clone(&self.repository);
        let mut writes = self.writes.lock();
        while writes.try_join_next().is_some() {}
        writes.spawn(async move {
            if let Err(error) = repository.set_variable_value(&id, &value).await {
                warn!(variable_id = %id, %error, "failed to remember variable value");
            }
        });
    }
}

impl Drop for VariableManager {
    fn drop(&mut self) {
        // Unflushed writes keep running after the run ends.
        self.writes.get_mut().detach_all();
    }
}

impl std::fmt::Debug for VariableManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableManager")
            .field("resolved", &self.values.lock().len())
            .field("pending_writes", &self.writes.lock().len())
            .finish_non_exhaustive()
    }
}
