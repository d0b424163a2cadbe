//! Variable repository port
//!
//! The engine reads variable definitions through this port and writes
//! remembered values back through it.

use async_trait::async_trait;
use courier_domain::Variable;

/// Errors that can occur during variable store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Variable not found.
    #[error("variable not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence collaborator for variables.
///
/// Implementations must tolerate concurrent external edits: a variable
/// deleted while a run is in progress is simply reported as absent.
#[async_trait]
pub trait VariableRepository: Send + Sync {
    /// Loads a variable by id.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn get_variable(&self, id: &str) -> Result<Option<Variable>, RepositoryError>;

    /// Loads a variable by key.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn find_by_key(&self, key: &str) -> Result<Option<Variable>, RepositoryError>;

    /// Persists `value` as the variable's stored value. Last write wins.
    ///
    /// # Errors
    /// Returns `RepositoryError::NotFound` if the variable no longer exists.
    async fn set_variable_value(&self, id: &str, value: &str) -> Result<(), RepositoryError>;

    /// Finds a variable by id, falling back to its key.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn find(&self, id_or_key: &str) -> Result<Option<Variable>, RepositoryError> {
        match self.get_variable(id_or_key).await? {
            Some(variable) => Ok(Some(variable)),
            None => self.find_by_key(id_or_key).await,
        }
    }
}
