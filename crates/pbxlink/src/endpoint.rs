//! Endpoint resolution: from a base address to a session URL.
//!
//! The service is usually configured with an HTTP address such as
//! `http://localhost:8080`, while sessions live on WebSocket paths. This
//! module does the translation and appends the query parameters every
//! session needs:
//!
//! ```text
//! http://localhost:8080  +  /call  →  ws://localhost:8080/call?id=<uuid>&dump=false
//! ```

use std::fmt;

use url::Url;

use crate::PbxError;

/// The session paths the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallEndpoint {
    /// Plain media-over-WebSocket calls.
    Call,
    /// Calls whose media runs over WebRTC.
    WebRtc,
    /// Calls bridged to SIP.
    Sip,
}

impl CallEndpoint {
    /// The URL path of this endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Self::Call => "/call",
            Self::WebRtc => "/call/webrtc",
            Self::Sip => "/call/sip",
        }
    }
}

impl fmt::Display for CallEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Per-connection options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Session identifier to use verbatim. A random UUID is minted when
    /// this is `None` or empty.
    pub session_id: Option<String>,
    /// Ask the service to record the session's traffic.
    pub dump: bool,
}

impl ConnectOptions {
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_dump(mut self, dump: bool) -> Self {
        self.dump = dump;
        self
    }
}

/// A fully resolved session target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTarget {
    pub url: Url,
    /// The identifier embedded in `url` as the `id` query parameter.
    pub session_id: String,
}

/// Builds the WebSocket URL for `endpoint` under `base`.
///
/// `http` becomes `ws`, `https` becomes `wss`, `ws`/`wss` are kept and an
/// address without a scheme is treated as `ws`. A trailing slash on
/// `base` is ignored.
///
/// # Errors
/// Returns [`PbxError::InvalidUrl`] if the result does not parse.
pub fn resolve(
    base: &str,
    endpoint: CallEndpoint,
    options: &ConnectOptions,
) -> Result<EndpointTarget, PbxError> {
    let session_id = match options.session_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let raw = format!("{}{}", websocket_base(base), endpoint.path());
    let mut url = parse(&raw)?;
    url.query_pairs_mut()
        .append_pair("id", &session_id)
        .append_pair("dump", if options.dump { "true" } else { "false" });

    Ok(EndpointTarget { url, session_id })
}

/// The base address for one-shot HTTP calls.
///
/// The inverse of the WebSocket mapping: `ws` becomes `http`, `wss`
/// becomes `https`, and a schemeless address is treated as `http`.
pub fn http_base(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("ws://") {
        format!("http://{rest}")
    } else if let Some(rest) = base.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if base.starts_with("http://") || base.starts_with("https://") {
        base.to_owned()
    } else {
        format!("http://{base}")
    }
}

fn websocket_base(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_owned()
    } else {
        format!("ws://{base}")
    }
}

pub(crate) fn parse(raw: &str) -> Result<Url, PbxError> {
    Url::parse(raw).map_err(|source| PbxError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}
