//! Error types for the protocol layer.
//!
//! Each crate in pbxlink defines its own error enum. A `ProtocolError`
//! always means a serialization problem, never a network one.

/// Errors that can occur while encoding commands or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a command into a frame).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning a frame into an event).
    ///
    /// Common causes: malformed JSON, a missing `event` field, or a field
    /// with the wrong type.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but is not a valid message.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
