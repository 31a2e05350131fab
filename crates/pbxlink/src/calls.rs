//! Response shapes for the one-shot call management endpoints.

use pbxlink_protocol::CallOption;
use serde::{Deserialize, Serialize};

/// How an active call is carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    WebRtc,
    Sip,
    WebSocket,
    /// A call type newer than this crate.
    #[serde(other)]
    Unknown,
}

/// One entry of `GET /call/lists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInfo {
    pub id: String,
    pub call_type: CallType,
    /// RFC 3339 timestamp, as reported by the service.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub option: Option<CallOption>,
}

/// The body of `GET /call/lists`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallList {
    #[serde(default)]
    pub calls: Vec<CallInfo>,
}

/// One entry of `GET /iceservers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}
