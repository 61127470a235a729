//! # sync-types
//!
//! Record and wire format types for todo-sync.
//!
//! This crate provides the foundational types used across all todo-sync crates:
//! - [`TodoItem`], [`TodoId`], [`Priority`], [`Category`] - The synchronized record
//! - [`DeviceRole`] - Which side of the device pair a process is
//! - [`Message`] - Sync messages (ListPush, ListRequest)
//! - [`CodecError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;
mod todo;

pub use error::CodecError;
pub use ids::{DeviceRole, TodoId};
pub use messages::{ListPush, Message};
pub use todo::{Category, Priority, TodoItem};

/// Encode a record list as the JSON array used for durable storage.
pub fn encode_list(todos: &[TodoItem]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec_pretty(todos)?)
}

/// Decode a JSON record array written by [`encode_list`].
pub fn decode_list(bytes: &[u8]) -> Result<Vec<TodoItem>, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
