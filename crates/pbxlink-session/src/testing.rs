//! In-memory connection for exercising the session without a socket.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pbxlink_transport::{Connection, ConnectionId, TransportError};
use tokio::sync::mpsc;

use crate::SessionConfig;

/// Reads come from a channel fed by [`Script::push`]; dropping the
/// [`Script`] reads as the peer closing. Writes fail if built with
/// `fail_writes`.
pub(crate) struct ScriptedConnection {
    frames: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
    fail_writes: AtomicBool,
    terminated: Arc<AtomicBool>,
}

/// The test's side of a [`ScriptedConnection`].
pub(crate) struct Script {
    frames: mpsc::UnboundedSender<String>,
    pub(crate) terminated: Arc<AtomicBool>,
}

impl Script {
    pub(crate) fn push(&self, frame: &str) {
        let _ = self.frames.send(frame.to_owned());
    }
}

impl Connection for ScriptedConnection {
    type Error = TransportError;

    async fn send(&self, _text: &str) -> Result<(), TransportError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(TransportError::SendFailed(io::Error::other("broken pipe")))
        } else {
            Ok(())
        }
    }

    async fn recv(&self) -> Result<Option<String>, TransportError> {
        Ok(self.frames.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(7)
    }
}

pub(crate) fn scripted(fail_writes: bool) -> (ScriptedConnection, Script) {
    let (tx, rx) = mpsc::unbounded_channel();
    let terminated = Arc::new(AtomicBool::new(false));
    let conn = ScriptedConnection {
        frames: tokio::sync::Mutex::new(rx),
        fail_writes: AtomicBool::new(fail_writes),
        terminated: Arc::clone(&terminated),
    };
    let script = Script {
        frames: tx,
        terminated,
    };
    (conn, script)
}

pub(crate) fn quick_config() -> SessionConfig {
    SessionConfig {
        close_grace: Duration::from_millis(50),
        ..SessionConfig::default()
    }
}
