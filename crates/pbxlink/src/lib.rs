//! # pbxlink
//!
//! Client for a call-control service that speaks JSON over a persistent
//! WebSocket.
//!
//! A [`PbxClient`] turns a base address into session URLs and opens
//! [`CallSession`]s on them. Each session runs its own receive loop and
//! delivers [`Event`]s to a handler while the caller sends commands.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pbxlink::prelude::*;
//!
//! # async fn run() -> Result<(), PbxError> {
//! let client = PbxClient::new("http://localhost:8080")?;
//! let session = client.connect_call(ConnectOptions::default()).await?;
//!
//! session.set_handler(|event: &Event| {
//!     println!("event: {}", event.event);
//! });
//! session
//!     .invite(CallOption {
//!         callee: Some("sip:bob@example.com".into()),
//!         ..CallOption::default()
//!     })
//!     .await?;
//! session.wait_for_event(EventKind::Answer, Duration::from_secs(30)).await?;
//! session.hangup_simple().await?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

mod calls;
mod client;
mod endpoint;
mod error;
mod webrtc;

pub use calls::{CallInfo, CallList, CallType, IceServer};
pub use client::{HTTP_TIMEOUT, PbxClient, PbxClientBuilder};
pub use endpoint::{
    CallEndpoint, ConnectOptions, EndpointTarget, http_base, resolve,
};
pub use error::PbxError;
pub use webrtc::{
    AnswerResponse, IceCandidate, SessionDescription, StatusResponse,
};

pub use pbxlink_protocol::{
    AudioCodec, CallCommand, CallOption, Command, EouOption, EouType, Event,
    EventKind, Provider, RecorderOption, ReferOption, SipOption,
    SynthesisOption, TranscriptionOption, TtsEmotion, TtsOptions, VadOption,
    VadType,
};
pub use pbxlink_session::{CallSession, EventHandler, SessionConfig, SessionError};

/// Installs a `tracing` subscriber that prints to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless; only the first call installs anything.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Everything needed for typical use, in one import.
pub mod prelude {
    pub use crate::{
        CallEndpoint, CallOption, CallSession, ConnectOptions, Event,
        EventKind, PbxClient, PbxError, SessionConfig, TtsOptions,
    };
}
