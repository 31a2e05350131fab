//! Call-control sessions for pbxlink.
//!
//! A [`CallSession`] is one long-lived connection to the call-control
//! service. Once opened it:
//!
//! 1. **Receives** — a background loop decodes every inbound frame into an
//!    [`Event`](pbxlink_protocol::Event) and hands it to the installed
//!    handler ([`CallSession::set_handler`])
//! 2. **Sends** — commands are written one frame at a time, serialized
//!    across tasks ([`CallSession::send`] and the typed helpers)
//! 3. **Waits** — [`CallSession::wait_for_event`] suspends until a given
//!    event kind arrives, without stealing events from the handler
//! 4. **Closes** — [`CallSession::close`] runs the close handshake once;
//!    later calls are no-ops
//!
//! # How it fits in the stack
//!
//! ```text
//! Client (above)  ← resolves endpoints, opens sessions
//!     ↕
//! Session Layer (this crate)  ← receive loop, handler, waits, close
//!     ↕
//! Protocol Layer  ← Command / Event shapes and the JSON codec
//!     ↕
//! Transport Layer  ← text frames over a WebSocket
//! ```
//!
//! Transport failures after open never surface as `Err` from a method
//! call; they arrive as `error` events, after which every send returns
//! [`SessionError::Closed`].

mod commands;
mod config;
mod error;
mod session;
#[cfg(test)]
mod testing;
mod wait;

pub use commands::{DEFAULT_HANGUP_INITIATOR, DEFAULT_HANGUP_REASON};
pub use config::{
    CLOSE_GRACE, CONNECT_TIMEOUT, READ_IDLE_TIMEOUT, SessionConfig,
    WRITE_TIMEOUT,
};
pub use error::SessionError;
pub use pbxlink_transport::WebSocketConnection;
pub use session::{CallSession, EventHandler};
