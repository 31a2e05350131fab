//! Error types for the session layer.

use std::time::Duration;

use pbxlink_protocol::ProtocolError;
use pbxlink_transport::TransportError;

/// Errors returned by [`CallSession`](crate::CallSession) operations.
///
/// Failures inside the background receive loop are never returned through
/// this type; they reach the caller as `error` events instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Dialing the service or the opening handshake failed.
    #[error("connect failed: {0}")]
    Connect(#[source] TransportError),

    /// The session's lifetime has ended (closed locally or by the peer).
    #[error("session is closed")]
    Closed,

    /// Writing a frame to the transport failed.
    #[error("send failed: {0}")]
    Send(#[source] TransportError),

    /// A deadline elapsed before the operation completed.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// What was being waited for, e.g. `"connect"`.
        operation: String,
        after: Duration,
    },

    /// A command could not be serialized.
    #[error(transparent)]
    Encode(#[from] ProtocolError),
}

impl SessionError {
    pub(crate) fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }
}
