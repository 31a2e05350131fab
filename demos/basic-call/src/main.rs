//! Places one call, greets the callee, echoes what it hears, then hangs up.
//!
//! ```text
//! RUST_LOG=debug cargo run -p basic-call -- ws://localhost:8080
//! ```

use std::time::Duration;

use pbxlink::prelude::*;
use pbxlink::{
    AudioCodec, Provider, SynthesisOption, TranscriptionOption, TtsEmotion,
    VadOption, VadType,
};

const GREETING: &str = "Hello! Welcome. How can I help you today?";

fn tts_option() -> SynthesisOption {
    SynthesisOption {
        provider: Some(Provider::Tencent),
        speaker: Some("101002".into()),
        sample_rate: Some(16000),
        emotion: Some(TtsEmotion::Neutral),
        ..SynthesisOption::default()
    }
}

/// Runs one command off the receive loop and logs if it fails.
fn spawn_command<F>(what: &'static str, fut: F)
where
    F: std::future::Future<Output = Result<(), pbxlink::SessionError>>
        + Send
        + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            tracing::warn!(error = %e, "failed to send {what}");
        }
    });
}

fn on_event(session: &CallSession, event: &Event) {
    match &event.event {
        EventKind::Incoming => {
            tracing::info!(caller = ?event.caller, callee = ?event.callee, "incoming call");
            let s = session.clone();
            spawn_command("accept", async move {
                s.accept(CallOption {
                    codec: Some(AudioCodec::Pcmu),
                    tts: Some(tts_option()),
                    ..CallOption::default()
                })
                .await
            });
        }
        EventKind::Answer => {
            tracing::info!("call answered");
            let s = session.clone();
            spawn_command("greeting", async move {
                s.tts(GREETING, TtsOptions::default()).await
            });
        }
        EventKind::Ringing => tracing::info!(early_media = ?event.early_media, "ringing"),
        EventKind::Hangup => {
            tracing::info!(reason = ?event.reason, initiator = ?event.initiator, "call ended");
        }
        EventKind::AsrFinal => {
            let text = event.text.clone().unwrap_or_default();
            tracing::info!(%text, "speech recognized");
            let s = session.clone();
            spawn_command("echo", async move {
                s.tts(format!("I heard you say: {text}"), TtsOptions::default())
                    .await
            });
        }
        EventKind::Silence if event.silence_at_least(5_000) => {
            tracing::info!(track = ?event.track_id, "long silence, nudging");
            let s = session.clone();
            spawn_command("nudge", async move {
                s.tts("Are you still there?", TtsOptions::default()).await
            });
        }
        EventKind::Dtmf => tracing::info!(digit = ?event.digit, "dtmf"),
        EventKind::Error => {
            tracing::warn!(sender = ?event.sender, error = ?event.error, code = ?event.code, "error event");
        }
        other => tracing::debug!(event = %other, "event"),
    }
}

#[tokio::main]
async fn main() -> Result<(), PbxError> {
    pbxlink::init_tracing();

    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://localhost:8080".to_owned());
    let client = PbxClient::new(base)?;

    let session = client
        .connect_call(
            ConnectOptions::default()
                .with_session_id("basic-call-example")
                .with_dump(true),
        )
        .await?;
    tracing::info!(session_id = %session.session_id(), "connected");

    let handle = session.clone();
    session.set_handler(move |event: &Event| on_event(&handle, event));

    session
        .invite(CallOption {
            caller: Some("sdk-user@example.com".into()),
            callee: Some("agent@example.com".into()),
            codec: Some(AudioCodec::Pcmu),
            tts: Some(tts_option()),
            asr: Some(TranscriptionOption {
                provider: Some(Provider::Tencent),
                language: Some("en-US".into()),
                sample_rate: Some(16000),
                ..TranscriptionOption::default()
            }),
            vad: Some(VadOption {
                vad_type: Some(VadType::Webrtc),
                aggressiveness: Some(3),
            }),
            ..CallOption::default()
        })
        .await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
        _ = session.wait_for_event(EventKind::Hangup, Duration::from_secs(60)) => {}
    }

    if !session.is_closed() {
        if let Err(e) = session.hangup_simple().await {
            tracing::warn!(error = %e, "hangup failed");
        }
    }
    session.close().await?;
    tracing::info!("done");
    Ok(())
}
