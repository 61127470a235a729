//! Durable storage for a device's list.
//!
//! One blob per device role holds the whole list as a JSON array. Loading
//! never fails from the caller's point of view: a missing or unreadable blob
//! means "start empty", so first run and corrupted state behave the same.

mod file;

pub use file::FileStore;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use todo_sync_types::{decode_list, encode_list, CodecError, TodoItem};

use crate::lock;

/// Storage errors. Only returned by `save`; the manager logs and swallows them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Encoding error.
    #[error("encoding error: {0}")]
    Codec(#[from] CodecError),

    /// Save rejected by a test store.
    #[error("save rejected: {0}")]
    Rejected(String),
}

/// Trait for list storage backends.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Replace the stored list.
    ///
    /// On failure the previously stored list must remain readable.
    async fn save(&self, todos: &[TodoItem]) -> Result<(), StoreError>;

    /// Read the stored list, or an empty list if there is none or it
    /// cannot be decoded.
    async fn load(&self) -> Vec<TodoItem>;
}

/// In-memory list store for testing.
///
/// Keeps the encoded bytes, so it exercises the same JSON codec as
/// [`FileStore`]. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    blob: Option<Vec<u8>>,
    saves: usize,
    fail_next_save: Option<String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `todos`.
    pub fn with_items(todos: &[TodoItem]) -> Self {
        let store = Self::new();
        lock(&store.inner).blob = encode_list(todos).ok();
        store
    }

    /// Overwrite the stored bytes directly (e.g. with garbage).
    pub fn set_raw(&self, bytes: &[u8]) {
        lock(&self.inner).blob = Some(bytes.to_vec());
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        lock(&self.inner).saves
    }

    /// Decode whatever is currently stored.
    pub fn stored(&self) -> Option<Vec<TodoItem>> {
        let inner = lock(&self.inner);
        inner.blob.as_deref().and_then(|b| decode_list(b).ok())
    }

    /// Cause the next `save()` to fail with the given message.
    pub fn fail_next_save(&self, reason: &str) {
        lock(&self.inner).fail_next_save = Some(reason.to_string());
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn save(&self, todos: &[TodoItem]) -> Result<(), StoreError> {
        let mut inner = lock(&self.inner);

        if let Some(reason) = inner.fail_next_save.take() {
            return Err(StoreError::Rejected(reason));
        }

        inner.blob = Some(encode_list(todos)?);
        inner.saves += 1;
        Ok(())
    }

    async fn load(&self) -> Vec<TodoItem> {
        let inner = lock(&self.inner);
        match inner.blob.as_deref() {
            None => Vec::new(),
            Some(bytes) => decode_list(bytes).unwrap_or_else(|e| {
                tracing::warn!("Stored list unreadable, starting empty: {}", e);
                Vec::new()
            }),
        }
    }
}
