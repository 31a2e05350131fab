//! Codec trait and implementations for serializing/deserializing frames.
//!
//! The session layer doesn't care HOW commands and events are turned into
//! text; it only needs something that implements [`Codec`]. The service
//! speaks JSON today, so [`JsonCodec`] is the only implementation.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that encodes values to text frames and decodes them back.
///
/// `Send + Sync + 'static` because a codec lives inside a session that is
/// shared with its background receive task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the frame is malformed or does
    /// not match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        frame: &str,
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use pbxlink_protocol::{CallCommand, Codec, Command, JsonCodec};
///
/// let codec = JsonCodec;
/// let cmd: Command = CallCommand::Mute { track_id: "t-1".into() }.into();
///
/// let frame = codec.encode(&cmd).unwrap();
/// assert_eq!(frame, r#"{"command":"mute","trackId":"t-1"}"#);
///
/// let decoded: Command = codec.decode(&frame).unwrap();
/// assert_eq!(cmd, decoded);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        frame: &str,
    ) -> Result<T, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Event, EventKind};

    #[test]
    fn test_json_codec_decodes_event() {
        let event: Event = JsonCodec
            .decode(r#"{"event":"dtmf","digit":"5","timestamp":10}"#)
            .unwrap();
        assert_eq!(event.event, EventKind::Dtmf);
        assert_eq!(event.digit.as_deref(), Some("5"));
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<Event, _> = JsonCodec.decode("not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
