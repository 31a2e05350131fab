//! Wire protocol for pbxlink.
//!
//! This crate defines the "language" spoken between a client and the
//! call-control service:
//!
//! - **Commands** ([`Command`], [`CallCommand`]) — what the client asks
//!   the service to do, keyed by the `command` field.
//! - **Events** ([`Event`], [`EventKind`]) — what the service reports
//!   back, keyed by the `event` field.
//! - **Options** ([`CallOption`] and friends) — call configuration
//!   carried inside commands.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those values are
//!   turned into text frames and back.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (text frames) and session
//! (a live call). It doesn't know about sockets; it only knows shapes.
//!
//! ```text
//! Transport (frames) → Protocol (Command / Event) → Session (handler)
//! ```

mod codec;
mod command;
mod error;
mod event;
mod options;

pub use codec::Codec;
pub use codec::JsonCodec;
pub use command::{CallCommand, Command};
pub use error::ProtocolError;
pub use event::{Event, EventKind};
pub use options::{
    AudioCodec, CallOption, EouOption, EouType, Provider,
    RecorderOption, ReferOption, SipOption, SynthesisOption,
    TranscriptionOption, TtsEmotion, TtsOptions, VadOption, VadType,
};
