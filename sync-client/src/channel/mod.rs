//! Sync channel abstraction.
//!
//! A channel links exactly two devices. The data manager only needs four
//! things from it:
//! - `send()` pushes the full list to the peer
//! - `request_list()` asks the peer for its list and awaits the reply
//! - `on_receive()` / `on_requested()` register the inbound callbacks
//! - `reachability()` reports whether the peer can be reached right now
//!
//! Payloads are [`Message`](todo_sync_types::Message)s in MessagePack.
//! A payload that fails to decode is dropped with a warning; it never
//! reaches the manager.
//!
//! # Example
//!
//! ```ignore
//! let (phone, watch) = PairedChannel::pair();
//! watch.on_receive(Arc::new(|todos: Vec<TodoItem>| println!("got {}", todos.len())));
//! phone.send(&todos).await?;
//! ```

mod detached;
mod mock;
mod paired;

pub use detached::DetachedChannel;
pub use mock::MockChannel;
pub use paired::PairedChannel;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use todo_sync_types::{CodecError, TodoItem};
use tokio::sync::watch;

/// Callback invoked with every list the peer pushes.
pub type ReceiveHandler = Arc<dyn Fn(Vec<TodoItem>) + Send + Sync>;

/// Callback answering a peer's list request with the current list.
pub type ListProvider = Arc<dyn Fn() -> Vec<TodoItem> + Send + Sync>;

/// Channel errors.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Peer not reachable and nothing cached to fall back on.
    #[error("peer unreachable")]
    Unreachable,

    /// Peer has no list provider registered.
    #[error("peer has no list provider")]
    NoProvider,

    /// No reply arrived.
    #[error("request timed out")]
    Timeout,

    /// Payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Peer answered a request with something other than a list.
    #[error("unexpected reply to list request")]
    UnexpectedReply,
}

/// Two-endpoint message link between paired devices.
#[async_trait]
pub trait SyncChannel: Send + Sync {
    /// Push the full list to the peer.
    ///
    /// When the peer is unreachable an implementation may queue the list
    /// for later delivery (latest wins) and still return `Ok`.
    async fn send(&self, todos: &[TodoItem]) -> Result<(), ChannelError>;

    /// Ask the peer for its current list.
    async fn request_list(&self) -> Result<Vec<TodoItem>, ChannelError>;

    /// Register the handler for lists pushed by the peer. Replaces any
    /// previous handler.
    fn on_receive(&self, handler: ReceiveHandler);

    /// Register the provider answering the peer's list requests. Replaces
    /// any previous provider.
    fn on_requested(&self, provider: ListProvider);

    /// Watch the peer's reachability.
    fn reachability(&self) -> watch::Receiver<bool>;
}

