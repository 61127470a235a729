//! Mock channel for testing.
//!
//! Captures pushed lists and lets tests play the peer's side.

use super::{ChannelError, ListProvider, ReceiveHandler, SyncChannel};
use crate::lock;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use todo_sync_types::TodoItem;
use tokio::sync::watch;

/// Mock channel for testing.
///
/// Records every list sent, answers requests from a reply queue and lets
/// the test push lists or ask for the list as if it were the peer. Clones
/// share state.
#[derive(Clone)]
pub struct MockChannel {
    inner: Arc<Mutex<MockChannelInner>>,
    reachable: Arc<watch::Sender<bool>>,
}

#[derive(Default)]
struct MockChannelInner {
    sent_lists: Vec<Vec<TodoItem>>,
    requests: usize,
    replies: VecDeque<Vec<TodoItem>>,
    fail_next_send: Option<String>,
    handler: Option<ReceiveHandler>,
    provider: Option<ListProvider>,
}

impl MockChannel {
    /// Create a reachable mock channel.
    pub fn new() -> Self {
        Self::with_reachable(true)
    }

    /// Create a mock channel with the given initial reachability.
    pub fn with_reachable(reachable: bool) -> Self {
        let (tx, _) = watch::channel(reachable);
        Self {
            inner: Arc::new(Mutex::new(MockChannelInner::default())),
            reachable: Arc::new(tx),
        }
    }

    /// Get every list that was sent.
    pub fn sent_lists(&self) -> Vec<Vec<TodoItem>> {
        lock(&self.inner).sent_lists.clone()
    }

    /// Get the last list that was sent.
    pub fn last_sent(&self) -> Option<Vec<TodoItem>> {
        lock(&self.inner).sent_lists.last().cloned()
    }

    /// Number of successful sends.
    pub fn send_count(&self) -> usize {
        lock(&self.inner).sent_lists.len()
    }

    /// Number of `request_list()` calls.
    pub fn request_count(&self) -> usize {
        lock(&self.inner).requests
    }

    /// Queue a list to be returned by the next `request_list()` call.
    /// With nothing queued, requests fail with [`ChannelError::Timeout`].
    pub fn queue_reply(&self, todos: Vec<TodoItem>) {
        lock(&self.inner).replies.push_back(todos);
    }

    /// Cause the next `send()` to fail with the given error.
    pub fn fail_next_send(&self, error: &str) {
        lock(&self.inner).fail_next_send = Some(error.to_string());
    }

    /// Change reachability, notifying watchers.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.send_replace(reachable);
    }

    /// Deliver a list as if the peer pushed it. Returns false when no
    /// handler is registered.
    pub fn push_from_peer(&self, todos: Vec<TodoItem>) -> bool {
        let handler = lock(&self.inner).handler.clone();
        match handler {
            Some(handler) => {
                handler(todos);
                true
            }
            None => false,
        }
    }

    /// Ask for the list as if the peer requested it.
    pub fn ask_for_list(&self) -> Option<Vec<TodoItem>> {
        let provider = lock(&self.inner).provider.clone();
        provider.map(|provide| provide())
    }

    /// Clear captured lists, replies and counters. Registrations survive.
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.sent_lists.clear();
        inner.requests = 0;
        inner.replies.clear();
        inner.fail_next_send = None;
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("MockChannel")
            .field("sent_lists", &inner.sent_lists.len())
            .field("requests", &inner.requests)
            .field("reachable", &*self.reachable.borrow())
            .finish()
    }
}

#[async_trait]
impl SyncChannel for MockChannel {
    async fn send(&self, todos: &[TodoItem]) -> Result<(), ChannelError> {
        if !*self.reachable.borrow() {
            return Err(ChannelError::Unreachable);
        }

        let mut inner = lock(&self.inner);

        // Check for forced failure
        if let Some(error) = inner.fail_next_send.take() {
            return Err(ChannelError::SendFailed(error));
        }

        inner.sent_lists.push(todos.to_vec());
        Ok(())
    }

    async fn request_list(&self) -> Result<Vec<TodoItem>, ChannelError> {
        if !*self.reachable.borrow() {
            return Err(ChannelError::Unreachable);
        }

        let mut inner = lock(&self.inner);
        inner.requests += 1;
        inner.replies.pop_front().ok_or(ChannelError::Timeout)
    }

    fn on_receive(&self, handler: ReceiveHandler) {
        lock(&self.inner).handler = Some(handler);
    }

    fn on_requested(&self, provider: ListProvider) {
        lock(&self.inner).provider = Some(provider);
    }

    fn reachability(&self) -> watch::Receiver<bool> {
        self.reachable.subscribe()
    }
}
