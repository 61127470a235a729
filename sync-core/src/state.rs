//! Outbound sync state machine for one device.
//!
//! This module decides *when* the data manager persists, arms the debounce
//! timer, transmits its list, or asks the peer for its list. It takes events
//! as input and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (timers, channel, disk) is performed by sync-client, not by
//! this module. This enables instant unit testing without a runtime.
//!
//! Invariants:
//! - At most one debounce timer is outstanding; re-arming replaces it.
//! - A debounce expiry sends only if it belongs to the latest arm.
//! - An inbound list never produces [`Action::SendList`], which breaks the
//!   receive → merge → send → receive loop between the two devices.
//! - A list the peer has not merged live (failed, still pending, or only
//!   queued while unreachable) is pushed on the next reconnect edge instead
//!   of pulling the peer's older copy over it.

use std::time::Duration;

/// Default debounce window between the last local edit and the transmission.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Sync bookkeeping for one device - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    /// Debounce window.
    debounce: Duration,
    /// Generation of the most recent arm. Expiries carrying an older
    /// generation are stale.
    generation: u64,
    /// A debounce timer is armed and has not fired.
    send_pending: bool,
    /// Local edits exist that have not been handed to the channel
    /// successfully.
    unsent: bool,
    /// The last transmission was only queued for later delivery because the
    /// peer was unreachable.
    deferred: bool,
    /// Last reachability value observed.
    reachable: bool,
}

impl SyncState {
    /// Create a state machine with the given debounce window and the
    /// channel's current reachability.
    pub fn new(debounce: Duration, reachable: bool) -> Self {
        Self {
            debounce,
            generation: 0,
            send_pending: false,
            unsent: false,
            deferred: false,
            reachable,
        }
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (sync-client)
    /// is responsible for executing the returned actions in order.
    pub fn on_event(mut self, event: Event) -> (Self, Vec<Action>) {
        match event {
            Event::LocalMutation => {
                self.generation = self.generation.wrapping_add(1);
                self.send_pending = true;
                self.unsent = true;
                let arm = Action::ArmDebounce {
                    generation: self.generation,
                    delay: self.debounce,
                };
                (self, vec![Action::Persist, arm])
            }

            Event::DebounceElapsed { generation }
                if self.send_pending && generation == self.generation =>
            {
                self.send_pending = false;
                self.unsent = false;
                self.deferred = false;
                (self, vec![Action::SendList])
            }
            // Stale or already-cancelled timer
            Event::DebounceElapsed { .. } => (self, vec![]),

            Event::PeerListReceived => (self, vec![Action::Persist]),

            Event::StartupElapsed => (self, vec![Action::RequestPeerList]),

            Event::ReachabilityChanged { reachable } => {
                let was = self.reachable;
                self.reachable = reachable;
                if was || !reachable {
                    return (self, vec![]);
                }
                // false -> true edge
                if self.unsent || self.send_pending || self.deferred {
                    self.send_pending = false;
                    self.unsent = false;
                    self.deferred = false;
                    (self, vec![Action::CancelDebounce, Action::SendList])
                } else {
                    (self, vec![Action::RequestPeerList])
                }
            }

            Event::SendFailed => {
                self.unsent = true;
                (self, vec![])
            }

            Event::SendDeferred => {
                self.deferred = true;
                (self, vec![])
            }
        }
    }

    /// Debounce window in use.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// True while a debounce timer is armed.
    pub fn has_pending_send(&self) -> bool {
        self.send_pending
    }

    /// True if local edits have not reached the channel yet.
    pub fn has_unsent_changes(&self) -> bool {
        self.unsent
    }

    /// True if the last transmission is still waiting for the peer.
    pub fn has_deferred_send(&self) -> bool {
        self.deferred
    }

    /// Last observed reachability.
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, false)
    }
}

/// Events that drive the sync state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A local add/update/delete/toggle was applied to the list.
    LocalMutation,
    /// A debounce timer expired.
    DebounceElapsed {
        /// Generation carried by the [`Action::ArmDebounce`] that started it.
        generation: u64,
    },
    /// The peer's list arrived (push or reply) and was merged.
    PeerListReceived,
    /// The startup delay passed.
    StartupElapsed,
    /// The channel reported a reachability value.
    ReachabilityChanged {
        /// New value.
        reachable: bool,
    },
    /// The channel rejected a transmission.
    SendFailed,
    /// The channel accepted a transmission while the peer was unreachable
    /// and will deliver it later.
    SendDeferred,
}

/// Actions to be executed by the sync-client.
///
/// These are instructions, not side effects. The sync-client interprets
/// these and performs the actual I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write the current list to the durable store.
    Persist,
    /// (Re)start the single debounce timer, replacing any pending one.
    ArmDebounce {
        /// Tag to echo back in [`Event::DebounceElapsed`].
        generation: u64,
        /// Delay before expiry.
        delay: Duration,
    },
    /// Drop the pending debounce timer, if any.
    CancelDebounce,
    /// Transmit the current full list to the peer.
    SendList,
    /// Ask the peer for its list.
    RequestPeerList,
}
