//! # sync-core
//!
//! Pure logic for todo-sync (no I/O, instant tests).
//!
//! This crate implements the list mutations, the merge engine, the sync
//! state machine and the read-side queries without any channel or disk I/O,
//! enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (channel, disk, timers) is performed by `sync-client`, which
//! interprets the actions produced by [`SyncState`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod list;
pub mod merge;
pub mod query;
pub mod state;

pub use list::TodoList;
pub use merge::{merge_remote_wins, MergeOutcome};
pub use query::DayStats;
pub use state::{Action, Event, SyncState, DEFAULT_DEBOUNCE};
