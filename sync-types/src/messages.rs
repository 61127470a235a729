//! Messages exchanged between the two devices.
//!
//! Raw payloads are decoded into [`Message`] at the channel boundary, so the
//! data manager only ever sees one of two typed variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CodecError, TodoItem};

/// All possible sync messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// A device pushes its full list.
    ListPush(ListPush),
    /// A device asks the peer for its full list.
    ListRequest,
}

impl Message {
    /// Build a push carrying a snapshot of `todos`, stamped now.
    pub fn push(todos: Vec<TodoItem>) -> Self {
        Message::ListPush(ListPush {
            todos,
            sent_at: Utc::now(),
        })
    }

    /// Serialize to MessagePack bytes with named fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec_named(self).map_err(CodecError::Serialization)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        rmp_serde::from_slice(bytes).map_err(CodecError::Deserialization)
    }
}

/// Full-list push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPush {
    /// Every record the sender holds, in its stored order.
    pub todos: Vec<TodoItem>,
    /// Sender's clock at the moment of sending (informational only).
    pub sent_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Priority, TodoId};
    use chrono::TimeZone;

    fn sample() -> Vec<TodoItem> {
        let when = Utc.with_ymd_and_hms(2025, 5, 29, 12, 30, 0).unwrap();
        vec![
            TodoItem::with_id(TodoId::new(), "Groceries", when)
                .with_category(Category::Shopping)
                .with_priority(Priority::High),
            TodoItem::with_id(TodoId::new(), "Read chapter 4", when)
                .with_category(Category::Study)
                .with_description("pages 80-112")
                .completed(true),
        ]
    }

    #[test]
    fn list_push_preserves_records_and_order() {
        let todos = sample();
        let bytes = Message::push(todos.clone()).to_bytes().unwrap();

        match Message::from_bytes(&bytes).unwrap() {
            Message::ListPush(push) => assert_eq!(push.todos, todos),
            other => panic!("expected ListPush, got {:?}", other),
        }
    }

    #[test]
    fn list_request_decodes() {
        let bytes = Message::ListRequest.to_bytes().unwrap();
        assert_eq!(Message::from_bytes(&bytes).unwrap(), Message::ListRequest);
    }

    #[test]
    fn empty_push_is_valid() {
        let bytes = Message::push(vec![]).to_bytes().unwrap();
        assert!(matches!(
            Message::from_bytes(&bytes).unwrap(),
            Message::ListPush(ListPush { todos, .. }) if todos.is_empty()
        ));
    }

    #[test]
    fn garbage_payload_is_rejected() {
        let result = Message::from_bytes(&[0xc1, 0xff, 0x00]);
        assert!(matches!(result, Err(CodecError::Deserialization(_))));
    }
}
