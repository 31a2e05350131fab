//! The session connection: one live duplex channel to the service.
//!
//! A [`CallSession`] owns a transport connection and a background task
//! (the *receive loop*) that reads frames, decodes them into [`Event`]s
//! and hands each one to the currently installed handler.
//!
//! ```text
//!  caller tasks                         receive loop (one per session)
//!  ────────────                         ──────────────────────────────
//!  send() ──┐                           recv() ─→ decode ─→ handler(&event)
//!  close() ─┼─→ write lock ─→ conn          │
//!           │                               └─ fatal error ─→ handler(error event)
//!  set_handler() ─→ state lock ←─────────── reads handler per event
//! ```
//!
//! # Locking
//!
//! - `state` (a `parking_lot::Mutex`) guards the handler slot and the
//!   closed flags. It is never held across an `.await` or while a handler
//!   runs, so a handler may call back into the session.
//! - `write_lock` (a `tokio::sync::Mutex`) serializes writes so command
//!   frames and the close frame never interleave.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use pbxlink_protocol::{Codec, Command, Event, JsonCodec};
use pbxlink_transport::{Connection, TransportError, WebSocketConnection};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{SessionConfig, SessionError};

/// The function invoked once per inbound event.
///
/// Handlers run on the receive loop itself, so slow work should be moved
/// to a spawned task.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Mutable session state. Always accessed through `Inner::state`.
pub(crate) struct HandlerState {
    pub(crate) handler: Option<EventHandler>,
    /// No further sends are accepted.
    closed: bool,
    /// `close()` has run at least once.
    close_requested: bool,
    /// Why a write failure ended the session, until the receive loop
    /// reports it.
    fault: Option<String>,
}

pub(crate) struct Inner<C: Connection> {
    conn: C,
    codec: JsonCodec,
    session_id: String,
    config: SessionConfig,
    pub(crate) state: Mutex<HandlerState>,
    write_lock: tokio::sync::Mutex<()>,
    /// Cancelled when the session's lifetime ends, for whatever reason.
    pub(crate) cancel: CancellationToken,
    /// Cancelled once the receive loop has exited.
    done: CancellationToken,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl<C: Connection> Inner<C> {
    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn close_requested(&self) -> bool {
        self.state.lock().close_requested
    }

    /// Marks the lifetime as over and wakes everything waiting on it.
    fn mark_closed(&self) {
        self.state.lock().closed = true;
        self.cancel.cancel();
    }

    /// Ends the lifetime after a failed write. The receive loop turns
    /// `reason` into the session's single transport error event.
    fn fail(&self, reason: String) {
        {
            let mut state = self.state.lock();
            state.closed = true;
            state.fault.get_or_insert(reason);
        }
        self.cancel.cancel();
    }

    /// Hands one event to the active handler, if any.
    ///
    /// The handler is cloned out of the lock first so it can freely call
    /// `set_handler` or spawn a `wait_for_event`.
    fn dispatch(&self, event: &Event) {
        let handler = self.state.lock().handler.clone();
        if let Some(handler) = handler {
            handler(event);
        }
    }
}

/// A persistent call-control session.
///
/// Cloning is cheap and yields another handle onto the same session, which
/// is how handlers get hold of it to send commands back.
pub struct CallSession<C: Connection = WebSocketConnection> {
    pub(crate) inner: Arc<Inner<C>>,
}

impl<C: Connection> Clone for CallSession<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl CallSession<WebSocketConnection> {
    /// Dials `url` and starts the receive loop.
    ///
    /// `session_id` must be the identifier already embedded in `url`; it
    /// is recorded for logging and never changes afterwards.
    ///
    /// # Errors
    /// - [`SessionError::Connect`] — dial or handshake failed
    /// - [`SessionError::Timeout`] — no handshake within
    ///   `config.connect_timeout`
    pub async fn open(
        url: &str,
        session_id: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let session_id = session_id.into();
        let deadline = config.connect_timeout;

        let conn = match tokio::time::timeout(
            deadline,
            WebSocketConnection::connect(url),
        )
        .await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                tracing::debug!(%session_id, error = %e, "connect failed");
                return Err(SessionError::Connect(e));
            }
            Err(_) => {
                tracing::debug!(%session_id, ?deadline, "connect timed out");
                return Err(SessionError::timeout("connect", deadline));
            }
        };

        tracing::info!(%session_id, conn_id = %conn.id(), "session opened");
        Ok(Self::start(conn, session_id, config))
    }
}

impl<C> CallSession<C>
where
    C: Connection<Error = TransportError>,
{
    /// Wraps an already-established connection and spawns its receive
    /// loop. Must be called from within a Tokio runtime.
    pub fn start(
        conn: C,
        session_id: impl Into<String>,
        config: SessionConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            conn,
            codec: JsonCodec,
            session_id: session_id.into(),
            config,
            state: Mutex::new(HandlerState {
                handler: None,
                closed: false,
                close_requested: false,
                fault: None,
            }),
            write_lock: tokio::sync::Mutex::new(()),
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
            reader: Mutex::new(None),
        });

        let handle = tokio::spawn(receive_loop(Arc::clone(&inner)));
        *inner.reader.lock() = Some(handle);

        Self { inner }
    }

    /// The identifier this session was opened with.
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Returns `true` once the session no longer accepts commands.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Resolves when the session's lifetime ends, whether through
    /// [`close`](Self::close) or a transport failure.
    pub async fn closed(&self) {
        self.inner.cancel.cancelled().await;
    }

    /// Installs `handler` as the single active event handler, replacing
    /// any previous one.
    ///
    /// An event already being dispatched finishes on the old handler.
    pub fn set_handler<F>(&self, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.inner.state.lock().handler = Some(Arc::new(handler));
    }

    /// Removes the active handler. Events arriving afterwards are dropped.
    pub fn clear_handler(&self) {
        self.inner.state.lock().handler = None;
    }

    /// Serializes `command` and writes it as one frame.
    ///
    /// Concurrent sends are serialized; each call's frame is written
    /// whole, in the order the write lock is acquired.
    ///
    /// # Errors
    /// - [`SessionError::Closed`] — the session is closing or closed
    /// - [`SessionError::Encode`] — the command could not be serialized
    /// - [`SessionError::Send`] — the transport rejected the write
    /// - [`SessionError::Timeout`] — the write exceeded `write_timeout`
    pub async fn send(
        &self,
        command: impl Into<Command>,
    ) -> Result<(), SessionError> {
        if self.inner.is_closed() {
            return Err(SessionError::Closed);
        }
        let command = command.into();
        let frame = self.inner.codec.encode(&command)?;

        let _write = self.inner.write_lock.lock().await;
        // Close may have won the race for the write lock.
        if self.inner.is_closed() {
            return Err(SessionError::Closed);
        }

        let deadline = self.inner.config.write_timeout;
        match tokio::time::timeout(deadline, self.inner.conn.send(&frame)).await
        {
            Ok(Ok(())) => {
                tracing::trace!(
                    session_id = %self.inner.session_id,
                    command = command.name().unwrap_or("<raw>"),
                    "command sent"
                );
                Ok(())
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    session_id = %self.inner.session_id,
                    error = %e,
                    "send failed, closing session"
                );
                self.inner.fail(format!("write failed: {e}"));
                Err(SessionError::Send(e))
            }
            Err(_) => Err(SessionError::timeout("send", deadline)),
        }
    }

    /// Ends the session.
    ///
    /// The first call stops accepting commands, sends a close frame, waits
    /// up to `close_grace` for the peer to acknowledge, then tears the
    /// transport down. Every later call returns `Ok(())` immediately.
    ///
    /// # Errors
    /// Returns [`SessionError::Send`] if the close frame could not be
    /// written on a transport that was still up. The transport is torn
    /// down regardless.
    pub async fn close(&self) -> Result<(), SessionError> {
        {
            let mut state = self.inner.state.lock();
            if state.close_requested {
                return Ok(());
            }
            state.close_requested = true;
            state.closed = true;
        }
        self.inner.cancel.cancel();

        let session_id = &self.inner.session_id;
        tracing::debug!(%session_id, "closing session");

        let mut result = Ok(());
        if !self.inner.done.is_cancelled() {
            let _write = self.inner.write_lock.lock().await;
            let deadline = self.inner.config.write_timeout;
            match tokio::time::timeout(deadline, self.inner.conn.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(%session_id, error = %e, "close frame failed");
                    if !self.inner.done.is_cancelled() {
                        result = Err(SessionError::Send(e));
                    }
                }
                Err(_) => {
                    tracing::debug!(%session_id, "close frame timed out");
                }
            }
        }

        let grace = self.inner.config.close_grace;
        if tokio::time::timeout(grace, self.inner.done.cancelled())
            .await
            .is_err()
        {
            tracing::debug!(
                %session_id,
                ?grace,
                "close not acknowledged, forcing teardown"
            );
        }

        let reader = self.inner.reader.lock().take();
        if let Some(handle) = reader {
            handle.abort();
            let _ = handle.await;
        }
        self.inner.done.cancel();
        self.inner.conn.terminate().await;

        tracing::info!(%session_id, "session closed");
        result
    }
}

/// Milliseconds since the Unix epoch, for locally synthesized events.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Reads frames until the connection ends, dispatching each as an event.
///
/// Exactly one of these runs per session, spawned by `start`.
async fn receive_loop<C>(inner: Arc<Inner<C>>)
where
    C: Connection<Error = TransportError>,
{
    let session_id = inner.session_id.as_str();
    let idle = inner.config.read_idle_timeout;

    loop {
        // A local close keeps reading until the peer acknowledges or
        // `close` gives up and aborts this task.
        if inner.cancel.is_cancelled() && !inner.close_requested() {
            let reason = inner
                .state
                .lock()
                .fault
                .take()
                .unwrap_or_else(|| "session cancelled".to_owned());
            tracing::warn!(%session_id, %reason, "session ended by write failure");
            inner.dispatch(&Event::local_error("transport", reason, now_millis()));
            break;
        }

        let read = tokio::time::timeout(idle, inner.conn.recv());
        let outcome = tokio::select! {
            biased;
            _ = inner.cancel.cancelled(), if !inner.cancel.is_cancelled() => None,
            outcome = read => Some(outcome),
        };
        let Some(outcome) = outcome else {
            continue;
        };

        let frame =
            match outcome {
                Ok(Ok(Some(frame))) => frame,
                Ok(Ok(None)) => {
                    if inner.close_requested() {
                        tracing::debug!(%session_id, "close acknowledged");
                    } else {
                        tracing::info!(%session_id, "connection closed by peer");
                        inner.dispatch(&Event::local_error(
                            "transport",
                            "connection closed by peer",
                            now_millis(),
                        ));
                    }
                    break;
                }
                Ok(Err(e)) => {
                    if !inner.close_requested() {
                        tracing::warn!(%session_id, error = %e, "read failed");
                        inner.dispatch(&Event::local_error(
                            "transport",
                            format!("read error: {e}"),
                            now_millis(),
                        ));
                    }
                    break;
                }
                Err(_) => {
                    if !inner.close_requested() {
                        tracing::warn!(%session_id, ?idle, "read idle timeout");
                        inner.dispatch(&Event::local_error(
                            "transport",
                            format!("no frame received for {idle:?}"),
                            now_millis(),
                        ));
                    }
                    break;
                }
            };

        match inner.codec.decode::<Event>(&frame) {
            Ok(event) => {
                tracing::trace!(%session_id, event = %event.event, "event received");
                inner.dispatch(&event);
            }
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "dropping malformed frame");
                inner.dispatch(&Event::local_error(
                    "decoder",
                    format!("failed to parse event: {e}"),
                    now_millis(),
                ));
            }
        }
    }

    inner.mark_closed();
    inner.done.cancel();
    tracing::debug!(%session_id, "receive loop exited");
}
