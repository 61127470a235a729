//! JSON file store.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use todo_sync_types::{decode_list, encode_list, TodoItem};

use super::{StoreError, TodoStore};
use crate::SyncConfig;

/// Stores the list as a JSON file.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the real
/// one, so a failed save leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store at the configured role's blob path.
    pub fn for_config(config: &SyncConfig) -> Self {
        Self::new(config.blob_path())
    }

    /// Path of the list file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TodoStore for FileStore {
    async fn save(&self, todos: &[TodoItem]) -> Result<(), StoreError> {
        let bytes = encode_list(todos)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!("Saved {} todos to {}", todos.len(), self.path.display());
        Ok(())
    }

    async fn load(&self) -> Vec<TodoItem> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No list at {}, starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}, starting empty: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match decode_list(&bytes) {
            Ok(todos) => {
                tracing::debug!("Loaded {} todos from {}", todos.len(), self.path.display());
                todos
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to decode {}, starting empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }
}
