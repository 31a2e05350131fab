//! Waiting for one specific event without losing the others.
//!
//! [`CallSession::wait_for_event`] temporarily swaps in a handler that
//! watches for the wanted kind while still forwarding every event to
//! whatever handler was installed before. When the wait finishes, by
//! match, timeout or session close, the previous handler is put back.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pbxlink_protocol::{Event, EventKind};
use pbxlink_transport::{Connection, TransportError};
use tokio::sync::oneshot;

use crate::session::{EventHandler, Inner};
use crate::{CallSession, SessionError};

/// Puts the previous handler back when the wait ends, however it ends.
///
/// Restoration only happens if the temporary handler is still the active
/// one. If someone called `set_handler` in the meantime, their choice
/// wins and is left alone.
struct RestoreGuard<'a, C: Connection> {
    inner: &'a Inner<C>,
    temporary: EventHandler,
    previous: Option<EventHandler>,
}

impl<C: Connection> Drop for RestoreGuard<'_, C> {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        let still_ours = state
            .handler
            .as_ref()
            .is_some_and(|active| Arc::ptr_eq(active, &self.temporary));
        if still_ours {
            state.handler = self.previous.take();
        }
    }
}

impl<C> CallSession<C>
where
    C: Connection<Error = TransportError>,
{
    /// Waits for the next event of `kind`, up to `timeout`.
    ///
    /// Every event that arrives during the wait, matching or not, is still
    /// delivered to the handler that was active when the wait began.
    ///
    /// Safe to spawn from inside a handler: the wait itself never blocks
    /// the receive loop.
    ///
    /// # Errors
    /// - [`SessionError::Timeout`] — no matching event within `timeout`
    /// - [`SessionError::Closed`] — the session ended first
    pub async fn wait_for_event(
        &self,
        kind: impl Into<EventKind>,
        timeout: Duration,
    ) -> Result<Event, SessionError> {
        let kind = kind.into();
        if self.is_closed() {
            return Err(SessionError::Closed);
        }

        let (tx, rx) = oneshot::channel::<Event>();
        let slot = Mutex::new(Some(tx));

        let guard = {
            let mut state = self.inner.state.lock();
            let previous = state.handler.clone();
            let forward_to = previous.clone();
            let wanted = kind.clone();

            let temporary: EventHandler = Arc::new(move |event: &Event| {
                if event.is(&wanted) {
                    if let Some(tx) = slot.lock().take() {
                        let _ = tx.send(event.clone());
                    }
                }
                if let Some(handler) = &forward_to {
                    handler(event);
                }
            });
            state.handler = Some(Arc::clone(&temporary));

            RestoreGuard {
                inner: &self.inner,
                temporary,
                previous,
            }
        };

        tracing::trace!(
            session_id = %self.session_id(),
            event = %kind,
            ?timeout,
            "waiting for event"
        );

        let result = tokio::select! {
            biased;
            Ok(event) = rx => Ok(event),
            _ = self.inner.cancel.cancelled() => Err(SessionError::Closed),
            _ = tokio::time::sleep(timeout) => {
                Err(SessionError::timeout(format!("wait for {kind}"), timeout))
            }
        };

        drop(guard);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::testing::{ScriptedConnection, quick_config, scripted};

    fn active(session: &CallSession<ScriptedConnection>) -> Option<EventHandler> {
        session.inner.state.lock().handler.clone()
    }

    fn is_active(session: &CallSession<ScriptedConnection>, handler: &EventHandler) -> bool {
        active(session).is_some_and(|h| Arc::ptr_eq(&h, handler))
    }

    /// Installs a handler counting every event and returns it with its count.
    fn install_counter(
        session: &CallSession<ScriptedConnection>,
    ) -> (EventHandler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        session.set_handler(move |_: &Event| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let handler = active(session).expect("handler was just installed");
        (handler, count)
    }

    #[tokio::test]
    async fn test_match_restores_previous_handler() {
        let (conn, script) = scripted(false);
        let session = CallSession::start(conn, "s-1", quick_config());
        let (original, count) = install_counter(&session);

        let (result, ()) = tokio::join!(
            session.wait_for_event(EventKind::Answer, Duration::from_secs(1)),
            async {
                script.push(r#"{"event":"ringing","timestamp":1}"#);
                script.push(r#"{"event":"answer","timestamp":2}"#);
            },
        );

        let event = result.expect("answer should arrive");
        assert_eq!(event.timestamp, 2);
        assert!(is_active(&session, &original));
        // Both events, matching or not, reached the original handler.
        assert_eq!(count.load(Ordering::SeqCst), 2);

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_restores_previous_handler() {
        let (conn, _script) = scripted(false);
        let session = CallSession::start(conn, "s-1", quick_config());
        let (original, _) = install_counter(&session);

        let err = session
            .wait_for_event(EventKind::Hangup, Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Timeout { .. }));
        assert!(is_active(&session, &original));

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_timeout_without_previous_handler_leaves_none() {
        let (conn, _script) = scripted(false);
        let session = CallSession::start(conn, "s-1", quick_config());

        let err = session
            .wait_for_event(EventKind::Hangup, Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Timeout { .. }));
        assert!(active(&session).is_none());

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_peer_close_restores_previous_handler() {
        let (conn, script) = scripted(false);
        let session = CallSession::start(conn, "s-1", quick_config());
        let (original, count) = install_counter(&session);

        let (result, ()) = tokio::join!(
            session.wait_for_event(EventKind::Answer, Duration::from_secs(1)),
            async move { drop(script) },
        );

        assert!(matches!(result, Err(SessionError::Closed)));
        assert!(is_active(&session, &original));
        // The transport error event was still forwarded.
        assert_eq!(count.load(Ordering::SeqCst), 1);

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_handler_set_during_wait_is_kept() {
        let (conn, _script) = scripted(false);
        let session = CallSession::start(conn, "s-1", quick_config());
        let (original, _) = install_counter(&session);

        let (result, replacement) = tokio::join!(
            session.wait_for_event(EventKind::Answer, Duration::from_millis(50)),
            async {
                session.set_handler(|_: &Event| {});
                active(&session).expect("replacement was just installed")
            },
        );

        assert!(matches!(result, Err(SessionError::Timeout { .. })));
        assert!(is_active(&session, &replacement));
        assert!(!is_active(&session, &original));

        session.close().await.unwrap();
    }
}
