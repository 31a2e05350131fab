//! Call configuration carried by `invite`, `accept` and `refer`.
//!
//! Every field is optional. Unset fields are skipped on the wire so the
//! service applies its own defaults instead of receiving zeros or empty
//! strings. The `extra` maps are passed through untouched for settings
//! this crate doesn't model yet.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Closed enumerations
// ---------------------------------------------------------------------------

/// Audio codec negotiated for the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    /// G.711 μ-law.
    Pcmu,
    /// G.711 A-law.
    Pcma,
    /// G.722 wideband.
    G722,
    /// Linear PCM.
    Pcm,
}

/// Voice activity detector implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VadType {
    Webrtc,
    Silero,
    Ten,
}

/// Speech service provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Tencent,
    #[serde(rename = "voiceapi")]
    VoiceApi,
}

/// End-of-utterance detector implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EouType {
    Tencent,
}

/// Speaking style requested from the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsEmotion {
    Neutral,
    Sad,
    Happy,
    Angry,
    Fear,
    News,
    Story,
    Radio,
    Poetry,
    Call,
    Sajiao,
    Disgusted,
    Amaze,
    Peaceful,
    Exciting,
    Aojiao,
    Jieshuo,
}

// ---------------------------------------------------------------------------
// Nested option blocks
// ---------------------------------------------------------------------------

/// Server-side call recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder_file: Option<String>,
    #[serde(rename = "samplerate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptime: Option<String>,
}

/// Voice activity detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VadOption {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vad_type: Option<VadType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggressiveness: Option<u8>,
}

/// Speech recognition (ASR).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<u32>,
    #[serde(rename = "samplerate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// Speech synthesis (TTS).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisOption {
    #[serde(rename = "samplerate", skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<TtsEmotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
}

/// SIP credentials and headers for outbound SIP legs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SipOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<std::collections::HashMap<String, String>>,
}

/// End-of-utterance detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EouOption {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub eou_type: Option<EouType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// Call transfer (`refer`) settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass: Option<bool>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Music-on-hold URL played while the transfer rings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_hangup: Option<bool>,
}

/// Optional flags for a `tts` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_hangup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_stream: Option<bool>,
}

// ---------------------------------------------------------------------------
// CallOption
// ---------------------------------------------------------------------------

/// The main call configuration sent with `invite` and `accept`.
///
/// Build it with struct-update syntax:
///
/// ```rust
/// use pbxlink_protocol::{AudioCodec, CallOption};
///
/// let option = CallOption {
///     caller: Some("sdk@example.com".into()),
///     codec: Some(AudioCodec::Pcmu),
///     ..CallOption::default()
/// };
/// assert!(option.callee.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denoise: Option<bool>,
    /// SDP offer, for WebRTC calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder: Option<RecorderOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vad: Option<VadOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asr: Option<TranscriptionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<SynthesisOption>,
    /// Duration string understood by the service, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handshake_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_ipv6: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip: Option<SipOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<AudioCodec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eou: Option<EouOption>,
}
