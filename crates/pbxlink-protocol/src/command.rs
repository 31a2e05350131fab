//! Outbound commands: everything the client can ask the service to do.
//!
//! Every command travels as a flat JSON object whose `command` field names
//! the variant:
//!
//! ```text
//! { "command": "tts", "text": "hello", "playId": "p-1" }
//! ```
//!
//! [`CallCommand`] covers the commands this crate knows about. [`Command`]
//! adds a raw escape hatch so callers can send shapes newer than this
//! crate without waiting for a release.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CallOption, ReferOption};

/// A typed call-control command.
///
/// `#[serde(tag = "command")]` makes the variant name a field of the same
/// object instead of a wrapper, which is the shape the service expects.
/// Optional fields are skipped when `None`, never sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum CallCommand {
    /// Start an outbound call.
    Invite { option: CallOption },

    /// Answer an incoming call.
    Accept { option: CallOption },

    /// Decline an incoming call.
    Reject {
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<u16>,
    },

    /// Trickle ICE candidates for a WebRTC leg.
    Candidate { candidates: Vec<String> },

    /// Speak text through the synthesizer.
    #[serde(rename_all = "camelCase")]
    Tts {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        play_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_hangup: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        streaming: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_of_stream: Option<bool>,
    },

    /// Play an audio file from a URL.
    #[serde(rename_all = "camelCase")]
    Play {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_hangup: Option<bool>,
    },

    /// Stop whatever is currently playing.
    Interrupt,

    /// Pause playback.
    Pause,

    /// Resume paused playback.
    Resume,

    /// End the call.
    Hangup {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        initiator: Option<String>,
    },

    /// Transfer the call to another target.
    Refer {
        target: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<ReferOption>,
    },

    /// Mute a media track.
    #[serde(rename_all = "camelCase")]
    Mute { track_id: String },

    /// Unmute a media track.
    #[serde(rename_all = "camelCase")]
    Unmute { track_id: String },

    /// Append a turn to the conversation history kept by the service.
    History { speaker: String, text: String },
}

impl CallCommand {
    /// The wire discriminator for this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invite { .. } => "invite",
            Self::Accept { .. } => "accept",
            Self::Reject { .. } => "reject",
            Self::Candidate { .. } => "candidate",
            Self::Tts { .. } => "tts",
            Self::Play { .. } => "play",
            Self::Interrupt => "interrupt",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Hangup { .. } => "hangup",
            Self::Refer { .. } => "refer",
            Self::Mute { .. } => "mute",
            Self::Unmute { .. } => "unmute",
            Self::History { .. } => "history",
        }
    }
}

/// Anything that can be sent on a session.
///
/// `#[serde(untagged)]` means neither variant adds a wrapper: a `Call`
/// serializes exactly like its [`CallCommand`], and a `Raw` map is written
/// as-is. Decoding tries the typed form first and falls back to the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// A command this crate knows the shape of.
    Call(CallCommand),

    /// An arbitrary JSON object, sent without validation.
    ///
    /// The map should carry its own `command` field; the service decides
    /// whether it is acceptable.
    Raw(Map<String, Value>),
}

impl Command {
    /// The wire discriminator, if one is present.
    ///
    /// Always `Some` for typed commands; for raw maps it is the string
    /// value of the `command` key.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Call(cmd) => Some(cmd.name()),
            Self::Raw(map) => map.get("command").and_then(Value::as_str),
        }
    }
}

impl From<CallCommand> for Command {
    fn from(cmd: CallCommand) -> Self {
        Self::Call(cmd)
    }
}

impl From<Map<String, Value>> for Command {
    fn from(map: Map<String, Value>) -> Self {
        Self::Raw(map)
    }
}
