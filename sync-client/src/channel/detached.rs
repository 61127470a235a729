//! Channel for a device with no peer.

use super::{ChannelError, ListProvider, ReceiveHandler, SyncChannel};
use async_trait::async_trait;
use todo_sync_types::TodoItem;
use tokio::sync::watch;

/// A channel whose peer is never reachable.
///
/// Used when a device runs on its own: local edits persist, sends and
/// requests fail with [`ChannelError::Unreachable`], handlers are ignored.
#[derive(Debug)]
pub struct DetachedChannel {
    reachable: watch::Sender<bool>,
}

impl DetachedChannel {
    /// Create a detached channel.
    pub fn new() -> Self {
        let (reachable, _) = watch::channel(false);
        Self { reachable }
    }
}

impl Default for DetachedChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncChannel for DetachedChannel {
    async fn send(&self, _todos: &[TodoItem]) -> Result<(), ChannelError> {
        Err(ChannelError::Unreachable)
    }

    async fn request_list(&self) -> Result<Vec<TodoItem>, ChannelError> {
        Err(ChannelError::Unreachable)
    }

    fn on_receive(&self, _handler: ReceiveHandler) {}

    fn on_requested(&self, _provider: ListProvider) {}

    fn reachability(&self) -> watch::Receiver<bool> {
        self.reachable.subscribe()
    }
}
