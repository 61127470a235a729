//! The per-device data manager.
//!
//! [`TodoManager`] is a cheap handle; the list itself is owned by a single
//! background task that serialises every mutation, inbound merge, timer
//! expiry and reachability change. The task feeds those into
//! [`SyncState`] and executes the resulting [`Action`]s:
//!
//! ```text
//! handle ──Command──▶ ManagerTask ──Event──▶ SyncState
//!                          ▲                     │
//!                          └──────Action─────────┘
//!                     (persist, arm timer, send, request)
//! ```
//!
//! Every handle operation resolves once the change is applied and persisted,
//! so callers observe their own writes.

use crate::channel::{ListProvider, ReceiveHandler, SyncChannel};
use crate::store::{FileStore, TodoStore};
use crate::SyncConfig;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use todo_sync_core::{merge_remote_wins, Action, Event, SyncState, TodoList};
use todo_sync_types::{DeviceRole, TodoId, TodoItem};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};

/// Data manager errors.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// The manager task has shut down.
    #[error("data manager stopped")]
    Stopped,
}

type Ack = oneshot::Sender<()>;

enum Command {
    Add(TodoItem, Ack),
    Delete(TodoId, Ack),
    Update(TodoItem, Ack),
    Toggle(TodoId, Ack),
    Inbound(Vec<TodoItem>, Option<Ack>),
    RequestPeerList(Ack),
    Shutdown(Ack),
}

/// Handle to a device's data manager.
///
/// Clones talk to the same manager.
#[derive(Debug, Clone)]
pub struct TodoManager {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<Vec<TodoItem>>,
    role: DeviceRole,
}

impl TodoManager {
    /// Start a manager persisting to the role's JSON file under
    /// `config.data_dir`.
    pub async fn open<C>(config: SyncConfig, channel: C) -> Self
    where
        C: SyncChannel + 'static,
    {
        let store = FileStore::for_config(&config);
        Self::start(config, store, channel).await
    }

    /// Start a manager over the given store and channel.
    ///
    /// Loads the stored list (empty if absent or unreadable), registers the
    /// inbound handlers on the channel and spawns the manager task. The
    /// first peer list request goes out after `config.startup_delay`.
    pub async fn start<S, C>(config: SyncConfig, store: S, channel: C) -> Self
    where
        S: TodoStore + 'static,
        C: SyncChannel + 'static,
    {
        let items = store.load().await;
        tracing::info!("Starting {} data manager with {} todos", config.role, items.len());

        let (snapshot_tx, snapshot_rx) = watch::channel(items.clone());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let provider_view = snapshot_rx.clone();
        let provider: ListProvider = Arc::new(move || provider_view.borrow().clone());
        channel.on_requested(provider);

        let inbound = commands_tx.downgrade();
        let handler: ReceiveHandler = Arc::new(move |todos: Vec<TodoItem>| {
            match inbound.upgrade() {
                Some(tx) => {
                    let _ = tx.send(Command::Inbound(todos, None));
                }
                None => tracing::debug!("Data manager gone, inbound list dropped"),
            }
        });
        channel.on_receive(handler);

        let mut reachability = channel.reachability();
        let reachable = *reachability.borrow_and_update();

        let task = ManagerTask {
            list: TodoList::from_items(items),
            state: SyncState::new(config.debounce, reachable),
            store,
            channel: Arc::new(channel),
            snapshot: snapshot_tx,
            commands: commands_rx,
            requests: commands_tx.downgrade(),
            request_timeout: config.request_timeout,
            debounce: None,
            startup: Some(Instant::now() + config.startup_delay),
            reachability,
            reachability_open: true,
        };
        tokio::spawn(task.run());

        Self {
            commands: commands_tx,
            snapshot: snapshot_rx,
            role: config.role,
        }
    }

    /// Role this manager was started for.
    pub fn role(&self) -> DeviceRole {
        self.role
    }

    /// Append a record.
    pub async fn add(&self, todo: TodoItem) -> Result<(), ManagerError> {
        self.call(|ack| Command::Add(todo, ack)).await
    }

    /// Remove the first record with `id`. Persists and schedules a sync even
    /// when nothing matched.
    pub async fn delete(&self, id: TodoId) -> Result<(), ManagerError> {
        self.call(|ack| Command::Delete(id, ack)).await
    }

    /// Replace the record sharing `todo.id`. No-op if none matches.
    pub async fn update(&self, todo: TodoItem) -> Result<(), ManagerError> {
        self.call(|ack| Command::Update(todo, ack)).await
    }

    /// Flip a record's completion flag. No-op if none matches.
    pub async fn toggle_completion(&self, id: TodoId) -> Result<(), ManagerError> {
        self.call(|ack| Command::Toggle(id, ack)).await
    }

    /// Merge a list received from the peer. Never triggers a transmission.
    pub async fn on_inbound_sync(&self, remote: Vec<TodoItem>) -> Result<(), ManagerError> {
        self.call(|ack| Command::Inbound(remote, Some(ack))).await
    }

    /// Ask the peer for its list and merge the reply.
    ///
    /// Resolves once the reply is merged or the request has failed or timed
    /// out; a failed request is not an error.
    pub async fn request_peer_list(&self) -> Result<(), ManagerError> {
        self.call(Command::RequestPeerList).await
    }

    /// Stop the manager task. A pending debounce is dropped, not flushed.
    pub async fn shutdown(&self) -> Result<(), ManagerError> {
        self.call(Command::Shutdown).await
    }

    /// Snapshot of the current list.
    pub fn current_list(&self) -> Vec<TodoItem> {
        self.snapshot.borrow().clone()
    }

    /// Watch the list; the receiver is notified after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<TodoItem>> {
        self.snapshot.clone()
    }

    async fn call(&self, command: impl FnOnce(Ack) -> Command) -> Result<(), ManagerError> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(command(ack))
            .map_err(|_| ManagerError::Stopped)?;
        done.await.map_err(|_| ManagerError::Stopped)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Add(todo, _) => write!(f, "Add({:?})", todo.id),
            Command::Delete(id, _) => write!(f, "Delete({:?})", id),
            Command::Update(todo, _) => write!(f, "Update({:?})", todo.id),
            Command::Toggle(id, _) => write!(f, "Toggle({:?})", id),
            Command::Inbound(todos, _) => write!(f, "Inbound({} todos)", todos.len()),
            Command::RequestPeerList(_) => write!(f, "RequestPeerList"),
            Command::Shutdown(_) => write!(f, "Shutdown"),
        }
    }
}

/// Far enough ahead that a disabled timer branch never wins.
const IDLE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

struct ManagerTask<S, C> {
    list: TodoList,
    state: SyncState,
    store: S,
    channel: Arc<C>,
    snapshot: watch::Sender<Vec<TodoItem>>,
    commands: mpsc::UnboundedReceiver<Command>,
    requests: mpsc::WeakUnboundedSender<Command>,
    request_timeout: Duration,
    /// Deadline and generation of the armed debounce timer.
    debounce: Option<(Instant, u64)>,
    startup: Option<Instant>,
    reachability: watch::Receiver<bool>,
    reachability_open: bool,
}

impl<S, C> ManagerTask<S, C>
where
    S: TodoStore + 'static,
    C: SyncChannel + 'static,
{
    async fn run(mut self) {
        loop {
            let idle = Instant::now() + IDLE;
            let debounce_at = self.debounce.map_or(idle, |(at, _)| at);
            let startup_at = self.startup.unwrap_or(idle);

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown(ack)) => {
                        if self.debounce.take().is_some() {
                            tracing::debug!("Dropping pending debounce on shutdown");
                        }
                        let _ = ack.send(());
                        break;
                    }
                    Some(command) => self.handle(command).await,
                    None => break,
                },

                _ = sleep_until(debounce_at), if self.debounce.is_some() => {
                    if let Some((_, generation)) = self.debounce.take() {
                        self.apply(Event::DebounceElapsed { generation }).await;
                    }
                }

                _ = sleep_until(startup_at), if self.startup.is_some() => {
                    self.startup = None;
                    self.apply(Event::StartupElapsed).await;
                }

                changed = self.reachability.changed(), if self.reachability_open => {
                    match changed {
                        Ok(()) => {
                            let reachable = *self.reachability.borrow_and_update();
                            tracing::debug!("Peer reachability changed: {}", reachable);
                            self.apply(Event::ReachabilityChanged { reachable }).await;
                        }
                        Err(_) => self.reachability_open = false,
                    }
                }
            }
        }

        tracing::info!("Data manager stopped");
    }

    async fn handle(&mut self, command: Command) {
        tracing::debug!("Handling {:?}", command);

        match command {
            Command::Add(todo, ack) => {
                self.list.add(todo);
                self.local_mutation().await;
                let _ = ack.send(());
            }
            Command::Delete(id, ack) => {
                if !self.list.remove(&id) {
                    tracing::debug!("Delete of unknown todo {:?}", id);
                }
                self.local_mutation().await;
                let _ = ack.send(());
            }
            Command::Update(todo, ack) => {
                let id = todo.id;
                if self.list.replace(todo) {
                    self.local_mutation().await;
                } else {
                    tracing::debug!("Update of unknown todo {:?} ignored", id);
                }
                let _ = ack.send(());
            }
            Command::Toggle(id, ack) => {
                if self.list.toggle(&id).is_some() {
                    self.local_mutation().await;
                } else {
                    tracing::debug!("Toggle of unknown todo {:?} ignored", id);
                }
                let _ = ack.send(());
            }
            Command::Inbound(remote, ack) => {
                self.merge_inbound(remote).await;
                if let Some(ack) = ack {
                    let _ = ack.send(());
                }
            }
            Command::RequestPeerList(ack) => self.spawn_request(Some(ack)),
            Command::Shutdown(ack) => {
                let _ = ack.send(());
            }
        }
    }

    async fn local_mutation(&mut self) {
        self.publish();
        self.apply(Event::LocalMutation).await;
    }

    async fn merge_inbound(&mut self, remote: Vec<TodoItem>) {
        let outcome = merge_remote_wins(&remote, self.list.items());
        tracing::info!(
            "Merged peer list: {} from peer, {} kept local",
            outcome.from_remote,
            outcome.kept_local
        );
        if !outcome.overridden.is_empty() {
            tracing::warn!(
                "Peer version replaced {} local edits: {:?}",
                outcome.overridden.len(),
                outcome.overridden
            );
        }

        self.list.replace_all(outcome.items);
        self.publish();
        self.apply(Event::PeerListReceived).await;
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.list.snapshot());
    }

    /// Feed an event through the state machine, executing actions until no
    /// follow-up events remain.
    async fn apply(&mut self, event: Event) {
        let mut events = VecDeque::from([event]);

        while let Some(event) = events.pop_front() {
            let (state, actions) = self.state.clone().on_event(event);
            self.state = state;

            for action in actions {
                if let Some(next) = self.execute(action).await {
                    events.push_back(next);
                }
            }
        }
    }

    async fn execute(&mut self, action: Action) -> Option<Event> {
        match action {
            Action::Persist => {
                if let Err(e) = self.store.save(self.list.items()).await {
                    tracing::warn!("Failed to persist list: {}", e);
                }
                None
            }
            Action::ArmDebounce { generation, delay } => {
                self.debounce = Some((Instant::now() + delay, generation));
                None
            }
            Action::CancelDebounce => {
                self.debounce = None;
                None
            }
            Action::SendList => {
                let todos = self.list.snapshot();
                match self.channel.send(&todos).await {
                    // Accepted but queued until the peer is back
                    Ok(()) if !*self.reachability.borrow() => {
                        tracing::debug!("Queued {} todos for unreachable peer", todos.len());
                        Some(Event::SendDeferred)
                    }
                    Ok(()) => {
                        tracing::debug!("Sent {} todos to peer", todos.len());
                        None
                    }
                    Err(e) => {
                        tracing::warn!("Failed to send list to peer: {}", e);
                        Some(Event::SendFailed)
                    }
                }
            }
            Action::RequestPeerList => {
                self.spawn_request(None);
                None
            }
        }
    }

    /// Request the peer's list off the task so a slow peer cannot stall
    /// local edits. The reply comes back as an inbound command.
    fn spawn_request(&self, ack: Option<Ack>) {
        let channel = Arc::clone(&self.channel);
        let commands = self.requests.clone();
        let timeout = self.request_timeout;

        tokio::spawn(async move {
            let failure = match tokio::time::timeout(timeout, channel.request_list()).await {
                Ok(Ok(todos)) => {
                    tracing::debug!("Peer replied with {} todos", todos.len());
                    match commands.upgrade() {
                        Some(tx) => {
                            let _ = tx.send(Command::Inbound(todos, ack));
                        }
                        None => tracing::debug!("Data manager gone, peer reply dropped"),
                    }
                    return;
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("no reply within {:?}", timeout),
            };

            tracing::debug!("Peer list request failed: {}", failure);
            if let Some(ack) = ack {
                let _ = ack.send(());
            }
        });
    }
}
