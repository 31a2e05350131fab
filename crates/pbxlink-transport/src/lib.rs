//! Transport abstraction layer for pbxlink.
//!
//! Provides the [`Connection`] trait that abstracts over a duplex,
//! message-oriented link to the call-control service. The session layer
//! only ever talks to this trait, so tests and alternative transports can
//! slot in underneath it.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket client via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketConnection;

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A single duplex connection carrying text frames.
///
/// The returned futures are `Send` so a session can drive `recv` from a
/// spawned task while other tasks call `send`.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one text frame to the remote peer.
    fn send(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next text frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Starts the cooperative close handshake by sending a close frame.
    ///
    /// The peer's acknowledgment shows up as `recv` returning `Ok(None)`.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Tears the connection down without waiting for the peer.
    ///
    /// Any further `send` or `recv` fails.
    fn terminate(&self) -> impl Future<Output = ()> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
