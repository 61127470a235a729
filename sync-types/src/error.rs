//! Error types for todo-sync encoding.

use thiserror::Error;

/// Errors raised while encoding or decoding records and messages.
#[derive(Debug, Error)]
pub enum CodecError {
    /// MessagePack serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] rmp_serde::encode::Error),

    /// MessagePack deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] rmp_serde::decode::Error),

    /// JSON encoding or decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
