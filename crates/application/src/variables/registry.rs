//! Variable type registry
//!
//! Maps each [`VariableKind`] to the strategy that produces its value.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use courier_domain::{Variable, VariableKind};

use super::types;
use crate::error::ExecutionResult;
use crate::execution::ExecutionContext;

/// The outcome of resolving one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    /// Value substituted into templates.
    pub value: String,
    /// Value written back to the store when the variable is persisted.
    /// `None` stores `value` itself.
    pub stored: Option<String>,
}

impl ResolvedValue {
    /// A value that is stored as is.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            stored: None,
        }
    }

    /// A value whose stored form differs, such as an ISO date behind a
    /// custom display pattern.
    #[must_use]
    pub fn storing(value: impl Into<String>, stored: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            stored: Some(stored.into()),
        }
    }

    /// Returns what should be written back to the store.
    #[must_use]
    pub fn stored_form(&self) -> &str {
        self.stored.as_deref().unwrap_or(&self.value)
    }
}

/// Strategy resolving variables of one kind.
#[async_trait]
pub trait VariableType: Send + Sync {
    /// Produces the value of `variable` for the run owning `ctx`.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Cancelled` when the user dismisses a prompt,
    /// and a user or configuration error for invalid input or settings.
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue>;

    /// Whether every resolution is persisted, regardless of the variable's
    /// remember flag. Used by kinds that keep state between runs.
    fn always_persists(&self) -> bool {
        false
    }
}

/// Lookup table from variable kind to its strategy.
#[derive(Clone, Default)]
pub struct VariableTypeRegistry {
    types: HashMap<VariableKind, Arc<dyn VariableType>>,
}

impl VariableTypeRegistry {
    /// Creates a registry without any kinds.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(VariableKind::Constant, Arc::new(types::ConstantType));
        registry.register(VariableKind::Text, Arc::new(types::TextType::text()));
        registry.register(VariableKind::Password, Arc::new(types::TextType::password()));
        registry.register(VariableKind::Number, Arc::new(types::TextType::number()));
        registry.register(VariableKind::Slider, Arc::new(types::SliderType));
        registry.register(VariableKind::Date, Arc::new(types::DateType));
        registry.register(VariableKind::Time, Arc::new(types::TimeType));
        registry.register(VariableKind::Timestamp, Arc::new(types::TimestampType));
        registry.register(VariableKind::Select, Arc::new(types::SelectType));
        registry.register(VariableKind::Toggle, Arc::new(types::ToggleType));
        registry.register(VariableKind::Color, Arc::new(types::ColorType));
        registry.register(VariableKind::Increment, Arc::new(types::IncrementType));
        registry.register(VariableKind::Uuid, Arc::new(types::UuidType));
        registry
    }

    /// Registers `variable_type` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: VariableKind, variable_type: Arc<dyn VariableType>) {
        self.types.insert(kind, variable_type);
    }

    /// Returns the strategy for `kind`.
    #[must_use]
    pub fn get(&self, kind: VariableKind) -> Option<Arc<dyn VariableType>> {
        self.types.get(&kind).cloned()
    }

    /// Returns true if `kind` has a strategy.
    #[must_use]
    pub fn contains(&self, kind: VariableKind) -> bool {
        self.types.contains_key(&kind)
    }
}

impl std::fmt::Debug for VariableTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.types.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("VariableTypeRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_kind() {
        let registry = VariableTypeRegistry::with_defaults();
        for kind in VariableKind::all() {
            assert!(registry.contains(*kind), "missing {kind}");
        }
    }

    #[test]
    fn test_stored_form() {
        assert_eq!(ResolvedValue::new("a").stored_form(), "a");
        assert_eq!(ResolvedValue::storing("7 Mar", "2024-03-07").stored_form(), "2024-03-07");
    }
}
