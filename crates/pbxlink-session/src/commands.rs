//! Typed shorthands for every call-control command.
//!
//! Each helper builds one [`CallCommand`] and hands it to
//! [`CallSession::send`]; none of them add behavior of their own.

use pbxlink_protocol::{CallCommand, CallOption, ReferOption, TtsOptions};
use pbxlink_transport::{Connection, TransportError};
use serde_json::{Map, Value};

use crate::{CallSession, SessionError};

/// Hangup reason sent by [`CallSession::hangup_simple`].
pub const DEFAULT_HANGUP_REASON: &str = "normal_clearing";

/// Hangup initiator sent by [`CallSession::hangup_simple`].
pub const DEFAULT_HANGUP_INITIATOR: &str = "caller";

impl<C> CallSession<C>
where
    C: Connection<Error = TransportError>,
{
    /// Starts an outbound call.
    pub async fn invite(&self, option: CallOption) -> Result<(), SessionError> {
        self.send(CallCommand::Invite { option }).await
    }

    /// Answers the incoming call on this session.
    pub async fn accept(&self, option: CallOption) -> Result<(), SessionError> {
        self.send(CallCommand::Accept { option }).await
    }

    pub async fn reject(
        &self,
        reason: impl Into<String>,
        code: Option<u16>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Reject {
            reason: reason.into(),
            code,
        })
        .await
    }

    /// Trickles ICE candidates to the service.
    pub async fn candidate(
        &self,
        candidates: Vec<String>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Candidate { candidates }).await
    }

    /// Speaks `text`. Unset fields in `options` are left off the wire.
    pub async fn tts(
        &self,
        text: impl Into<String>,
        options: TtsOptions,
    ) -> Result<(), SessionError> {
        let TtsOptions {
            speaker,
            play_id,
            auto_hangup,
            streaming,
            end_of_stream,
        } = options;
        self.send(CallCommand::Tts {
            text: text.into(),
            speaker,
            play_id,
            auto_hangup,
            streaming,
            end_of_stream,
        })
        .await
    }

    /// Speaks `text` with the service's default voice and no options.
    pub async fn tts_simple(
        &self,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.tts(text, TtsOptions::default()).await
    }

    pub async fn play(
        &self,
        url: impl Into<String>,
        auto_hangup: Option<bool>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Play {
            url: url.into(),
            auto_hangup,
        })
        .await
    }

    pub async fn interrupt(&self) -> Result<(), SessionError> {
        self.send(CallCommand::Interrupt).await
    }

    pub async fn pause(&self) -> Result<(), SessionError> {
        self.send(CallCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<(), SessionError> {
        self.send(CallCommand::Resume).await
    }

    /// Ends the call.
    pub async fn hangup(
        &self,
        reason: Option<String>,
        initiator: Option<String>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Hangup { reason, initiator }).await
    }

    /// Ends the call with a normal-clearing reason, initiated by the caller.
    pub async fn hangup_simple(&self) -> Result<(), SessionError> {
        self.hangup(
            Some(DEFAULT_HANGUP_REASON.to_owned()),
            Some(DEFAULT_HANGUP_INITIATOR.to_owned()),
        )
        .await
    }

    /// Transfers the call to `target`.
    pub async fn refer(
        &self,
        target: impl Into<String>,
        options: Option<ReferOption>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Refer {
            target: target.into(),
            options,
        })
        .await
    }

    pub async fn mute(
        &self,
        track_id: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Mute {
            track_id: track_id.into(),
        })
        .await
    }

    pub async fn unmute(
        &self,
        track_id: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::Unmute {
            track_id: track_id.into(),
        })
        .await
    }

    /// Appends one turn to the service-side conversation history.
    pub async fn history(
        &self,
        speaker: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.send(CallCommand::History {
            speaker: speaker.into(),
            text: text.into(),
        })
        .await
    }

    /// Sends an arbitrary JSON object as-is.
    ///
    /// The object should carry its own `command` field.
    pub async fn send_raw(
        &self,
        object: Map<String, Value>,
    ) -> Result<(), SessionError> {
        self.send(object).await
    }
}
