//! In-process channel linking two devices.
//!
//! Both ends live in the same process and share one reachability flag.
//! Every payload is really encoded to MessagePack and decoded on the other
//! side, so the wire format is exercised end to end.
//!
//! While the link is down a push is kept as the peer's pending context
//! (only the latest survives) and delivered when the link comes back.
//! A list request made while the link is down is answered from the last
//! list this end received, if any.

use super::{ChannelError, ListProvider, ReceiveHandler, SyncChannel};
use crate::lock;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use todo_sync_types::{Message, TodoItem};
use tokio::sync::watch;

/// One end of an in-process device pair.
///
/// Clones refer to the same end.
#[derive(Clone)]
pub struct PairedChannel {
    local: Arc<Mutex<Endpoint>>,
    remote: Arc<Mutex<Endpoint>>,
    link: Arc<watch::Sender<bool>>,
}

#[derive(Default)]
struct Endpoint {
    handler: Option<ReceiveHandler>,
    provider: Option<ListProvider>,
    pending: Option<Vec<u8>>,
    last_received: Option<Vec<TodoItem>>,
    received: usize,
}

impl PairedChannel {
    /// Create two linked ends, initially reachable.
    pub fn pair() -> (Self, Self) {
        let (tx, _) = watch::channel(true);
        let link = Arc::new(tx);
        let a = Arc::new(Mutex::new(Endpoint::default()));
        let b = Arc::new(Mutex::new(Endpoint::default()));

        (
            Self {
                local: Arc::clone(&a),
                remote: Arc::clone(&b),
                link: Arc::clone(&link),
            },
            Self {
                local: b,
                remote: a,
                link,
            },
        )
    }

    /// Bring the link up or down for both ends.
    ///
    /// Coming up delivers any pending context on either side.
    pub fn set_reachable(&self, reachable: bool) {
        let was = self.link.send_replace(reachable);
        if reachable && !was {
            for endpoint in [&self.local, &self.remote] {
                let pending = lock(endpoint).pending.take();
                if let Some(bytes) = pending {
                    tracing::debug!("Delivering pending context ({} bytes)", bytes.len());
                    deliver(endpoint, &bytes);
                }
            }
        }
    }

    /// Whether the link is currently up.
    pub fn is_reachable(&self) -> bool {
        *self.link.borrow()
    }

    /// Number of lists this end has received from the peer.
    pub fn received_count(&self) -> usize {
        lock(&self.local).received
    }

    /// Deliver raw bytes to this end as if the peer had sent them.
    pub fn inject_raw(&self, bytes: &[u8]) {
        deliver(&self.local, bytes);
    }
}

impl std::fmt::Debug for PairedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairedChannel")
            .field("reachable", &self.is_reachable())
            .field("received", &self.received_count())
            .finish()
    }
}

/// Decode `bytes` and hand a pushed list to the endpoint's handler.
fn deliver(endpoint: &Mutex<Endpoint>, bytes: &[u8]) {
    let message = match Message::from_bytes(bytes) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Dropping malformed payload ({} bytes): {}", bytes.len(), e);
            return;
        }
    };

    match message {
        Message::ListPush(push) => {
            let handler = {
                let mut state = lock(endpoint);
                state.last_received = Some(push.todos.clone());
                state.received += 1;
                state.handler.clone()
            };
            match handler {
                Some(handler) => handler(push.todos),
                None => tracing::debug!("No receive handler, list dropped"),
            }
        }
        Message::ListRequest => {
            tracing::warn!("Ignoring list request outside request/reply exchange");
        }
    }
}

/// Answer a list request on the peer's side. Returns the encoded reply.
fn answer(endpoint: &Mutex<Endpoint>, request: &[u8]) -> Result<Vec<u8>, ChannelError> {
    match Message::from_bytes(request)? {
        Message::ListRequest => {
            let provider = lock(endpoint).provider.clone();
            let provide = provider.ok_or(ChannelError::NoProvider)?;
            Ok(Message::push(provide()).to_bytes()?)
        }
        Message::ListPush(_) => Err(ChannelError::UnexpectedReply),
    }
}

#[async_trait]
impl SyncChannel for PairedChannel {
    async fn send(&self, todos: &[TodoItem]) -> Result<(), ChannelError> {
        let bytes = Message::push(todos.to_vec()).to_bytes()?;

        {
            // Checked under the peer's lock so a concurrent reconnect either
            // sees the pending context or lets this push go straight through
            let mut remote = lock(&self.remote);
            if !self.is_reachable() {
                tracing::debug!("Peer unreachable, keeping {} todos as context", todos.len());
                remote.pending = Some(bytes);
                return Ok(());
            }
        }
        deliver(&self.remote, &bytes);
        Ok(())
    }

    async fn request_list(&self) -> Result<Vec<TodoItem>, ChannelError> {
        if !self.is_reachable() {
            return lock(&self.local)
                .last_received
                .clone()
                .ok_or(ChannelError::Unreachable);
        }

        let request = Message::ListRequest.to_bytes()?;
        let reply = answer(&self.remote, &request)?;

        match Message::from_bytes(&reply)? {
            Message::ListPush(push) => Ok(push.todos),
            Message::ListRequest => Err(ChannelError::UnexpectedReply),
        }
    }

    fn on_receive(&self, handler: ReceiveHandler) {
        lock(&self.local).handler = Some(handler);
    }

    fn on_requested(&self, provider: ListProvider) {
        lock(&self.local).provider = Some(provider);
    }

    fn reachability(&self) -> watch::Receiver<bool> {
        self.link.subscribe()
    }
}
