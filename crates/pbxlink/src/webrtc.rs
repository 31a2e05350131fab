//! SDP offer/answer exchange over the service's one-shot WebRTC endpoints.
//!
//! These calls are independent of any [`CallSession`](pbxlink_session::CallSession):
//! a browser-style peer posts its offer, gets an answer back, then trickles
//! ICE candidates against the returned session id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{decode_json, PbxClient};
use crate::PbxError;

/// One side of an SDP negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// `"offer"` or `"answer"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: "offer".to_owned(),
            sdp: sdp.into(),
        }
    }
}

/// A single trickled ICE candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMLineIndex", default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(rename = "sdpMid", default)]
    pub sdp_mid: Option<String>,
}

#[derive(Debug, Serialize)]
struct OfferRequest<'a> {
    sdp: SessionDescription,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

/// The service's answer to an offer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerResponse {
    pub sdp: SessionDescription,
    pub session_id: String,
    #[serde(default)]
    pub ice_candidates: Option<Vec<IceCandidate>>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
struct CandidateRequest<'a> {
    session_id: &'a str,
    candidate: &'a IceCandidate,
}

#[derive(Debug, Serialize)]
struct CloseRequest<'a> {
    session_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Acknowledgement returned by the candidate and close endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    pub session_id: String,
    pub status: String,
}

/// Error body the WebRTC endpoints send with a failure status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl PbxClient {
    /// Posts an SDP offer and returns the service's answer.
    pub async fn send_offer(
        &self,
        offer_sdp: impl Into<String>,
        session_id: Option<&str>,
        metadata: Option<Value>,
    ) -> Result<AnswerResponse, PbxError> {
        let request = OfferRequest {
            sdp: SessionDescription::offer(offer_sdp),
            session_id,
            metadata,
        };
        let answer: AnswerResponse =
            self.post_json("/webrtc/offer", &request).await?;
        tracing::info!(session_id = %answer.session_id, "received sdp answer");
        Ok(answer)
    }

    /// Trickles one ICE candidate for `session_id`.
    pub async fn send_ice_candidate(
        &self,
        session_id: &str,
        candidate: &IceCandidate,
    ) -> Result<StatusResponse, PbxError> {
        tracing::debug!(%session_id, "sending ice candidate");
        self.post_json(
            "/webrtc/ice-candidate",
            &CandidateRequest {
                session_id,
                candidate,
            },
        )
        .await
    }

    /// Ends a WebRTC session on the service side.
    pub async fn close_webrtc_session(
        &self,
        session_id: &str,
        reason: Option<&str>,
    ) -> Result<StatusResponse, PbxError> {
        tracing::info!(%session_id, "closing webrtc session");
        self.post_json("/webrtc/close", &CloseRequest { session_id, reason })
            .await
    }

    /// Offers `offer_sdp` and returns `(session_id, answer_sdp)`.
    pub async fn exchange_sdp(
        &self,
        offer_sdp: impl Into<String>,
    ) -> Result<(String, String), PbxError> {
        let answer = self.send_offer(offer_sdp, None, None).await?;
        Ok((answer.session_id, answer.sdp.sdp))
    }

    /// Offers `offer_sdp`, then trickles every candidate in `candidates`.
    ///
    /// A rejected candidate is logged and skipped; only the offer itself
    /// can fail the whole setup.
    pub async fn setup_webrtc_session(
        &self,
        offer_sdp: impl Into<String>,
        candidates: &[IceCandidate],
        metadata: Option<Value>,
    ) -> Result<AnswerResponse, PbxError> {
        let answer = self.send_offer(offer_sdp, None, metadata).await?;
        for candidate in candidates {
            if let Err(e) =
                self.send_ice_candidate(&answer.session_id, candidate).await
            {
                tracing::warn!(
                    session_id = %answer.session_id,
                    error = %e,
                    "ice candidate rejected"
                );
            }
        }
        Ok(answer)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, PbxError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .http()
            .post(self.http_url(path))
            .timeout(self.http_timeout())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return decode_json(resp).await;
        }

        // Prefer the structured `{error, code}` body when there is one.
        let text = resp.text().await.unwrap_or_default();
        let body = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(err) => format!("{} (code: {})", err.error, err.code),
            Err(_) => text,
        };
        Err(PbxError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}
