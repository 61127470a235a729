//! # sync-client
//!
//! Device-side runtime for todo-sync.
//!
//! This is the library an app embeds on each of the two paired devices.
//!
//! ## Features
//!
//! - **Single-owner list**: one task owns the list; handles send commands
//! - **Debounced sync**: bursts of edits go out as one full-list push
//! - **Remote-wins merge**: inbound lists are merged, persisted, never echoed
//! - **Channel abstraction**: in-process pair, mock and detached channels
//! - **Pure State Machine**: Uses sync-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use todo_sync_client::{PairedChannel, SyncConfig, TodoManager};
//! use todo_sync_types::{DeviceRole, TodoItem};
//!
//! let (phone_link, watch_link) = PairedChannel::pair();
//! let phone = TodoManager::open(SyncConfig::new(DeviceRole::Primary, dir), phone_link).await;
//! let watch = TodoManager::open(SyncConfig::new(DeviceRole::Companion, dir), watch_link).await;
//!
//! phone.add(TodoItem::new("Buy milk")).await?;
//! // ~500 ms later the watch has it too
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod manager;
pub mod store;

pub use channel::{
    ChannelError, DetachedChannel, ListProvider, MockChannel, PairedChannel, ReceiveHandler,
    SyncChannel,
};
pub use config::{SyncConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_STARTUP_DELAY};
pub use manager::{ManagerError, TodoManager};
pub use store::{FileStore, MemoryStore, StoreError, TodoStore};

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
