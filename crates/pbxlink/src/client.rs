//! `PbxClient` builder and connection entry points.
//!
//! The client holds the shared defaults (base address, HTTP client,
//! session timeouts) and hands out independent [`CallSession`]s. It keeps
//! no state about the sessions it opened.

use std::time::Duration;

use pbxlink_protocol::ProtocolError;
use pbxlink_session::{CallSession, SessionConfig};
use serde::de::DeserializeOwned;

use crate::calls::{CallList, IceServer};
use crate::endpoint::{self, CallEndpoint, ConnectOptions};
use crate::PbxError;

/// Default bound on each one-shot HTTP call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for a [`PbxClient`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use pbxlink::PbxClient;
///
/// let client = PbxClient::builder("http://localhost:8080")
///     .http_timeout(Duration::from_secs(5))
///     .build()
///     .expect("valid base url");
/// assert_eq!(client.http_base(), "http://localhost:8080");
/// ```
pub struct PbxClientBuilder {
    base_url: String,
    http_timeout: Duration,
    session_config: SessionConfig,
    http: Option<reqwest::Client>,
}

impl PbxClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_timeout: HTTP_TIMEOUT,
            session_config: SessionConfig::default(),
            http: None,
        }
    }

    /// Sets the bound applied to every one-shot HTTP call.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Sets the timeouts used by every session this client opens.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Uses a caller-provided HTTP client instead of a fresh one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Validates the base address and builds the client.
    ///
    /// # Errors
    /// Returns [`PbxError::InvalidUrl`] if the base address can't form a
    /// valid URL.
    pub fn build(self) -> Result<PbxClient, PbxError> {
        let base_url = self.base_url.trim_end_matches('/').to_owned();
        let http_base = endpoint::http_base(&base_url);
        endpoint::parse(&http_base)?;

        Ok(PbxClient {
            base_url,
            http_base,
            http: self.http.unwrap_or_default(),
            http_timeout: self.http_timeout,
            session_config: self.session_config,
        })
    }
}

/// Entry point for talking to the call-control service.
#[derive(Debug, Clone)]
pub struct PbxClient {
    base_url: String,
    http_base: String,
    http: reqwest::Client,
    http_timeout: Duration,
    session_config: SessionConfig,
}

impl PbxClient {
    /// Creates a client with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PbxError> {
        PbxClientBuilder::new(base_url).build()
    }

    pub fn builder(base_url: impl Into<String>) -> PbxClientBuilder {
        PbxClientBuilder::new(base_url)
    }

    /// The base address as configured, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The HTTP form of the base address used for one-shot calls.
    pub fn http_base(&self) -> &str {
        &self.http_base
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    /// Resolves `endpoint` and opens a session on it.
    pub async fn connect(
        &self,
        endpoint: CallEndpoint,
        options: ConnectOptions,
    ) -> Result<CallSession, PbxError> {
        let target = endpoint::resolve(&self.base_url, endpoint, &options)?;
        tracing::debug!(
            session_id = %target.session_id,
            url = %target.url,
            "connecting session"
        );
        let session = CallSession::open(
            target.url.as_str(),
            target.session_id,
            self.session_config.clone(),
        )
        .await?;
        Ok(session)
    }

    /// Opens a session on `/call`.
    pub async fn connect_call(
        &self,
        options: ConnectOptions,
    ) -> Result<CallSession, PbxError> {
        self.connect(CallEndpoint::Call, options).await
    }

    /// Opens a session on `/call/webrtc`.
    pub async fn connect_webrtc(
        &self,
        options: ConnectOptions,
    ) -> Result<CallSession, PbxError> {
        self.connect(CallEndpoint::WebRtc, options).await
    }

    /// Opens a session on `/call/sip`.
    pub async fn connect_sip(
        &self,
        options: ConnectOptions,
    ) -> Result<CallSession, PbxError> {
        self.connect(CallEndpoint::Sip, options).await
    }

    /// Lists the calls currently active on the service.
    pub async fn list_calls(&self) -> Result<CallList, PbxError> {
        let resp = self
            .http
            .get(self.http_url("/call/lists"))
            .timeout(self.http_timeout)
            .send()
            .await?;
        decode_json(ensure_success(resp).await?).await
    }

    /// Forcefully terminates the call `id`.
    ///
    /// # Errors
    /// Returns [`PbxError::CallNotFound`] if the service answers 404.
    pub async fn kill_call(&self, id: &str) -> Result<(), PbxError> {
        let url = self.http_url_with_segments(&["call", "kill", id])?;
        let resp = self
            .http
            .post(url)
            .timeout(self.http_timeout)
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PbxError::CallNotFound(id.to_owned()));
        }
        ensure_success(resp).await?;
        tracing::info!(call_id = %id, "call killed");
        Ok(())
    }

    /// Fetches the ICE servers to use for WebRTC legs.
    pub async fn ice_servers(&self) -> Result<Vec<IceServer>, PbxError> {
        let resp = self
            .http
            .get(self.http_url("/iceservers"))
            .timeout(self.http_timeout)
            .send()
            .await?;
        decode_json(ensure_success(resp).await?).await
    }

    /// Forwards a request to the service's LLM proxy under `/llm/v1/`.
    ///
    /// The response is returned untouched, whatever its status, so
    /// streaming bodies can be consumed by the caller.
    pub async fn proxy_llm(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: &[(&str, &str)],
    ) -> Result<reqwest::Response, PbxError> {
        let url = self.http_url(&format!("/llm/v1/{}", path.trim_start_matches('/')));
        let mut request = self
            .http
            .request(method, url)
            .timeout(self.http_timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }
        Ok(request.send().await?)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    pub(crate) fn http_url(&self, path: &str) -> String {
        format!("{}{}", self.http_base, path)
    }

    /// Appends `segments` to the HTTP base, percent-encoding each one so
    /// caller-supplied ids cannot add path levels or a query.
    pub(crate) fn http_url_with_segments(
        &self,
        segments: &[&str],
    ) -> Result<url::Url, PbxError> {
        let mut url = endpoint::parse(&self.http_base)?;
        url.path_segments_mut()
            .map_err(|()| PbxError::InvalidUrl {
                url: self.http_base.clone(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turns a non-2xx response into [`PbxError::UnexpectedStatus`].
pub(crate) async fn ensure_success(
    resp: reqwest::Response,
) -> Result<reqwest::Response, PbxError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "unexpected status");
    Err(PbxError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

/// Reads the whole body and decodes it as JSON.
///
/// A body that isn't the expected shape is a [`ProtocolError::Decode`].
pub(crate) async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, PbxError> {
    let text = resp.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| PbxError::Protocol(ProtocolError::Decode(e)))
}
