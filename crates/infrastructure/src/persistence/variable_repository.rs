//! File-backed variable store.
//!
//! All variables live in one JSON file:
//! ```json
//! {
//!   "variables": [
//!     { "id": "…", "key": "host", "kind": "constant", "value": "example.com" }
//!   ]
//! }
//! ```
//! The file is read once; lookups are served from memory and remembered
//! values are written back through to disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use courier_application::ports::{RepositoryError, VariableRepository};
use courier_domain::Variable;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::serialization::{SerializationError, read_json_file, write_json_file};

#[derive(Debug, Default, Serialize, Deserialize)]
struct VariableFile {
    #[serde(default)]
    variables: Vec<Variable>,
}

fn to_repository_error(error: SerializationError) -> RepositoryError {
    match error {
        SerializationError::Io(io) => RepositoryError::Io(io),
        other => RepositoryError::Serialization(other.to_string()),
    }
}

/// Variable store kept in a single JSON file.
///
/// Without a path the store is memory-only and writes are kept for the
/// lifetime of the process.
#[derive(Debug)]
pub struct FileVariableRepository {
    path: Option<PathBuf>,
    variables: RwLock<Vec<Variable>>,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileVariableRepository {
    /// Loads the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// variable has an invalid identity or a duplicate key.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let file: VariableFile = read_json_file(&path)
            .await
            .map_err(to_repository_error)?
            .unwrap_or_default();
        Self::check(&file.variables)?;
        debug!(path = %path.display(), count = file.variables.len(), "loaded variables");

        Ok(Self {
            path: Some(path),
            variables: RwLock::new(file.variables),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Creates a memory-only store.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable has an invalid identity or a
    /// duplicate key.
    pub fn in_memory(variables: Vec<Variable>) -> Result<Self, RepositoryError> {
        Self::check(&variables)?;
        Ok(Self {
            path: None,
            variables: RwLock::new(variables),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Returns the backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a snapshot of every variable.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.variables.read().clone()
    }

    fn check(variables: &[Variable]) -> Result<(), RepositoryError> {
        let mut ids = HashSet::new();
        let mut keys = HashSet::new();
        for variable in variables {
            variable
                .validate()
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
            if !ids.insert(variable.id.as_str()) {
                return Err(RepositoryError::Serialization(format!(
                    "duplicate variable id: {}",
                    variable.id
                )));
            }
            if !keys.insert(variable.key.as_str()) {
                return Err(RepositoryError::Serialization(format!(
                    "duplicate variable key: {}",
                    variable.key
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl VariableRepository for FileVariableRepository {
    async fn get_variable(&self, id: &str) -> Result<Option<Variable>, RepositoryError> {
        Ok(self.variables.read().iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Variable>, RepositoryError> {
        Ok(self.variables.read().iter().find(|v| v.key == key).cloned())
    }

    async fn set_variable_value(&self, id: &str, value: &str) -> Result<(), RepositoryError> {
        // Held across the write so the file always reflects the latest value.
        let _guard = self.write_lock.lock().await;

        let snapshot = {
            let mut variables = self.variables.write();
            let variable = variables
                .iter_mut()
                .find(|v| v.id == id)
                .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
            variable.value = Some(value.to_string());
            VariableFile {
                variables: variables.clone(),
            }
        };

        if let Some(path) = &self.path {
            write_json_file(path, &snapshot)
                .await
                .map_err(to_repository_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use courier_domain::VariableKind;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Variable> {
        vec![
            Variable::constant("host", "example.com").with_id("v1"),
            Variable::new("token", VariableKind::Password)
                .with_id("v2")
                .remembering(),
        ]
    }

    #[tokio::test]
    async fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileVariableRepository::load(dir.path().join("variables.json"))
            .await
            .unwrap();
        assert!(repo.variables().is_empty());
        assert_eq!(repo.find("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn lookups_by_id_and_key() {
        let repo = FileVariableRepository::in_memory(sample()).unwrap();
        assert_eq!(repo.get_variable("v1").await.unwrap().unwrap().key, "host");
        assert_eq!(repo.find_by_key("token").await.unwrap().unwrap().id, "v2");
        assert_eq!(repo.find("token").await.unwrap().unwrap().id, "v2");
        assert_eq!(repo.get_variable("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_value_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variables.json");
        write_json_file(&path, &VariableFile { variables: sample() })
            .await
            .unwrap();

        let repo = FileVariableRepository::load(&path).await.unwrap();
        repo.set_variable_value("v2", "s3cret").await.unwrap();
        repo.set_variable_value("v2", "newer").await.unwrap();

        let reloaded = FileVariableRepository::load(&path).await.unwrap();
        let token = reloaded.get_variable("v2").await.unwrap().unwrap();
        assert_eq!(token.value.as_deref(), Some("newer"));
        assert_eq!(token.remembered_value(), Some("newer"));
    }

    #[tokio::test]
    async fn set_value_of_deleted_variable() {
        let repo = FileVariableRepository::in_memory(sample()).unwrap();
        let err = repo.set_variable_value("gone", "x").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(id) if id == "gone"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let variables = vec![
            Variable::constant("host", "a").with_id("1"),
            Variable::constant("host", "b").with_id("2"),
        ];
        let err = FileVariableRepository::in_memory(variables).unwrap_err();
        assert!(err.to_string().contains("duplicate variable key"));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("variables.json");
        tokio::fs::write(&path, b"{\"variables\": 3}").await.unwrap();
        let err = FileVariableRepository::load(&path).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }
}
