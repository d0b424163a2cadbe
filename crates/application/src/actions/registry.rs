//! Action type registry
//!
//! Lookup table from type tag to the factory building that action kind,
//! together with the kind's script alias.

use std::fmt;
use std::sync::Arc;

use courier_domain::{ActionAlias, ActionData, ActionRecord};
use thiserror::Error;
use tracing::warn;

use super::Action;
use super::types;
use crate::error::{ExecutionError, ExecutionResult};

/// Stored data that does not fit its action kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid data for action '{type_tag}': {message}")]
pub struct ActionBuildError {
    /// Tag of the offending record.
    pub type_tag: String,
    /// What was wrong.
    pub message: String,
}

impl ActionBuildError {
    /// Creates an error for a record of kind `type_tag`.
    pub fn new(type_tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            message: message.into(),
        }
    }
}

impl From<ActionBuildError> for ExecutionError {
    fn from(error: ActionBuildError) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Builds an action from stored data.
pub type ActionFactory =
    Arc<dyn Fn(&ActionData) -> Result<Box<dyn Action>, ActionBuildError> + Send + Sync>;

/// Everything the engine knows about one action kind.
#[derive(Clone)]
pub struct ActionTypeDescriptor {
    /// Stable tag stored in action records.
    pub type_tag: &'static str,
    /// How the kind is written in scripts.
    pub alias: ActionAlias,
    factory: ActionFactory,
}

impl ActionTypeDescriptor {
    /// Creates a descriptor.
    pub fn new<F>(type_tag: &'static str, alias: ActionAlias, factory: F) -> Self
    where
        F: Fn(&ActionData) -> Result<Box<dyn Action>, ActionBuildError> + Send + Sync + 'static,
    {
        Self {
            type_tag,
            alias,
            factory: Arc::new(factory),
        }
    }

    /// Builds an action from `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not fit this kind.
    pub fn build(&self, data: &ActionData) -> Result<Box<dyn Action>, ActionBuildError> {
        (self.factory)(data)
    }
}

impl fmt::Debug for ActionTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTypeDescriptor")
            .field("type_tag", &self.type_tag)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// The set of action kinds a run can use.
#[derive(Debug, Clone, Default)]
pub struct ActionTypeRegistry {
    descriptors: Vec<ActionTypeDescriptor>,
}

impl ActionTypeRegistry {
    /// Creates a registry without any kinds.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for descriptor in types::builtin_descriptors() {
            registry.register(descriptor);
        }
        registry
    }

    /// Adds a kind, replacing any kind with the same tag.
    pub fn register(&mut self, descriptor: ActionTypeDescriptor) {
        match self
            .descriptors
            .iter_mut()
            .find(|d| d.type_tag == descriptor.type_tag)
        {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
    }

    /// Returns the descriptor for `type_tag`.
    #[must_use]
    pub fn get(&self, type_tag: &str) -> Option<&ActionTypeDescriptor> {
        self.descriptors.iter().find(|d| d.type_tag == type_tag)
    }

    /// Returns all registered kinds, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ActionTypeDescriptor> {
        self.descriptors.iter()
    }

    /// Returns the script alias of `type_tag`.
    #[must_use]
    pub fn alias(&self, type_tag: &str) -> Option<ActionAlias> {
        self.get(type_tag).map(|d| d.alias)
    }

    /// Returns the kind written as `function_name` in scripts.
    #[must_use]
    pub fn find_by_function_name(&self, function_name: &str) -> Option<&ActionTypeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.alias.function_name == function_name)
    }

    /// Builds the action stored in `record`.
    ///
    /// Records of unknown kinds, possibly written by a newer version, yield
    /// `Ok(None)` and a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's data does not fit its kind.
    pub fn from_stored_definition(
        &self,
        record: &ActionRecord,
    ) -> Result<Option<Box<dyn Action>>, ActionBuildError> {
        let Some(descriptor) = self.get(&record.type_tag) else {
            warn!(action = %record.type_tag, "skipping action of unknown type");
            return Ok(None);
        };
        descriptor.build(&record.data).map(Some)
    }

    /// Builds every action in `records`, omitting unknown kinds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the first record with invalid data.
    pub fn build_all(&self, records: &[ActionRecord]) -> ExecutionResult<Vec<Box<dyn Action>>> {
        let mut actions = Vec::with_capacity(records.len());
        for record in records {
            if let Some(action) = self.from_stored_definition(record)? {
                actions.push(action);
            }
        }
        Ok(actions)
    }
}
