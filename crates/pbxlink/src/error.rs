//! Unified error type for pbxlink.

use pbxlink_protocol::ProtocolError;
use pbxlink_session::SessionError;
use pbxlink_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `pbxlink` crate you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attributes
/// let `?` convert layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PbxError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (connect, closed, send, timeout).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A one-shot HTTP call failed before a response arrived.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A one-shot HTTP call got a non-success status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// `kill_call` named a call the service doesn't know.
    #[error("call with id {0} not found")]
    CallNotFound(String),

    /// The base address could not be turned into a valid URL.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
