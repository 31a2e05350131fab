//! Inbound events: notifications pushed by the service.
//!
//! Like commands, events are flat JSON objects keyed by a discriminator,
//! here the `event` field. Every other field is optional and only present
//! for the event kinds that use it:
//!
//! ```text
//! { "event": "silence", "trackId": "t-1", "timestamp": 1700000000000, "duration": 800 }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The discriminator of an [`Event`].
///
/// Unknown names are kept in [`EventKind::Other`] rather than rejected, so
/// a newer service doesn't break an older client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A call is arriving on this session.
    Incoming,
    /// The remote side answered; `sdp` may carry the answer.
    Answer,
    /// The remote side is ringing; `earlyMedia` tells whether audio flows.
    Ringing,
    /// The call ended.
    Hangup,
    /// A final speech recognition result.
    AsrFinal,
    /// An interim speech recognition result.
    AsrDelta,
    /// Voice activity started on a track.
    Speaking,
    /// Voice activity stopped; `duration` is in milliseconds.
    Silence,
    /// A DTMF digit was received.
    Dtmf,
    /// An error, either from the service or synthesized locally.
    Error,
    /// Any discriminator this crate doesn't know yet.
    Other(String),
}

impl EventKind {
    /// The wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Incoming => "incoming",
            Self::Answer => "answer",
            Self::Ringing => "ringing",
            Self::Hangup => "hangup",
            Self::AsrFinal => "asrFinal",
            Self::AsrDelta => "asrDelta",
            Self::Speaking => "speaking",
            Self::Silence => "silence",
            Self::Dtmf => "dtmf",
            Self::Error => "error",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "incoming" => Self::Incoming,
            "answer" => Self::Answer,
            "ringing" => Self::Ringing,
            "hangup" => Self::Hangup,
            "asrFinal" => Self::AsrFinal,
            "asrDelta" => Self::AsrDelta,
            "speaking" => Self::Speaking,
            "silence" => Self::Silence,
            "dtmf" => Self::Dtmf,
            "error" => Self::Error,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification decoded from an inbound frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Which kind of event this is.
    pub event: EventKind,

    /// The media track this event refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,

    /// Milliseconds since the Unix epoch, as stamped by the sender.
    #[serde(default)]
    pub timestamp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_media: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<String>,
    /// Sequence of an ASR result within the utterance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digit: Option<String>,
    /// Component that raised an `error` event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Free-form payload for fields this crate doesn't model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Event {
    /// Creates an event of the given kind with every optional field unset.
    pub fn new(event: impl Into<EventKind>, timestamp: u64) -> Self {
        Self {
            event: event.into(),
            track_id: None,
            timestamp,
            caller: None,
            callee: None,
            sdp: None,
            early_media: None,
            reason: None,
            initiator: None,
            index: None,
            start_time: None,
            end_time: None,
            text: None,
            duration: None,
            digit: None,
            sender: None,
            error: None,
            code: None,
            data: None,
        }
    }

    /// Builds an `error` event raised on the client side.
    ///
    /// `sender` names the component that failed, e.g. `"transport"`.
    pub fn local_error(
        sender: &str,
        message: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            sender: Some(sender.to_owned()),
            error: Some(message.into()),
            ..Self::new(EventKind::Error, timestamp)
        }
    }

    /// Returns `true` if this event has the given discriminator.
    pub fn is(&self, kind: &EventKind) -> bool {
        &self.event == kind
    }

    /// Returns `true` for a `silence` event lasting at least `min_ms`.
    ///
    /// A silence event without a `duration` never qualifies.
    pub fn silence_at_least(&self, min_ms: u64) -> bool {
        self.event == EventKind::Silence
            && self.duration.is_some_and(|d| d >= min_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_kinds_round_trip_through_strings() {
        for name in [
            "incoming", "answer", "ringing", "hangup", "asrFinal", "asrDelta",
            "speaking", "silence", "dtmf", "error",
        ] {
            let kind = EventKind::from(name);
            assert!(!matches!(kind, EventKind::Other(_)), "{name} should be known");
            assert_eq!(kind.as_str(), name);
            assert_eq!(String::from(kind), name);
        }
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = EventKind::from("metrics");
        assert_eq!(kind, EventKind::Other("metrics".into()));
        assert_eq!(kind.to_string(), "metrics");
    }

    #[test]
    fn test_decode_incoming_event() {
        let event: Event = serde_json::from_value(json!({
            "event": "incoming",
            "trackId": "track-123",
            "timestamp": 1_700_000_000_000u64,
            "caller": "alice@example.com",
            "callee": "bob@example.com",
            "sdp": "v=0\r\n"
        }))
        .unwrap();

        assert_eq!(event.event, EventKind::Incoming);
        assert_eq!(event.track_id.as_deref(), Some("track-123"));
        assert_eq!(event.timestamp, 1_700_000_000_000);
        assert_eq!(event.caller.as_deref(), Some("alice@example.com"));
        assert_eq!(event.sdp.as_deref(), Some("v=0\r\n"));
        assert!(event.text.is_none());
    }

    #[test]
    fn test_decode_minimal_event_defaults_timestamp() {
        let event: Event = serde_json::from_str(r#"{"event":"answer"}"#).unwrap();
        assert_eq!(event.event, EventKind::Answer);
        assert_eq!(event.timestamp, 0);
        assert!(event.track_id.is_none());
    }

    #[test]
    fn test_decode_event_with_data_payload() {
        let event: Event = serde_json::from_value(json!({
            "event": "metrics",
            "data": {"rtt": 42}
        }))
        .unwrap();
        assert_eq!(event.event, EventKind::Other("metrics".into()));
        assert_eq!(event.data.unwrap()["rtt"], 42);
    }

    #[test]
    fn test_decode_without_discriminator_fails() {
        let result: Result<Event, _> = serde_json::from_str(r#"{"text":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_omits_unset_fields() {
        let json = serde_json::to_value(Event::new(EventKind::Ringing, 5)).unwrap();
        assert_eq!(json, json!({"event": "ringing", "timestamp": 5}));
    }

    #[test]
    fn test_local_error_event() {
        let event = Event::local_error("transport", "read timed out", 99);
        assert!(event.is(&EventKind::Error));
        assert_eq!(event.sender.as_deref(), Some("transport"));
        assert_eq!(event.error.as_deref(), Some("read timed out"));
        assert_eq!(event.timestamp, 99);
    }

    #[test]
    fn test_silence_threshold_boundary() {
        let mut short = Event::new(EventKind::Silence, 0);
        short.duration = Some(799);
        let mut exact = Event::new(EventKind::Silence, 0);
        exact.duration = Some(800);

        assert!(!short.silence_at_least(800));
        assert!(exact.silence_at_least(800));
    }

    #[test]
    fn test_silence_threshold_requires_silence_with_duration() {
        let mut speaking = Event::new(EventKind::Speaking, 0);
        speaking.duration = Some(5_000);
        assert!(!speaking.silence_at_least(100));

        let no_duration = Event::new(EventKind::Silence, 0);
        assert!(!no_duration.silence_at_least(0));
    }
}
