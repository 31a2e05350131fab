//! WebSocket client transport using `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::{Connection, ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A client-side WebSocket connection.
///
/// The socket is split in two halves, each behind its own lock, so a task
/// parked in [`recv`](Connection::recv) never holds up a writer. Both
/// halves are `Option`s so [`terminate`](Connection::terminate) can drop
/// them, which closes the underlying TCP stream.
#[derive(Debug)]
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<Option<SplitSink<WsStream, Message>>>,
    stream: Mutex<Option<SplitStream<WsStream>>>,
}

impl WebSocketConnection {
    /// Dials `url` (`ws://` or `wss://`) and completes the opening
    /// handshake.
    ///
    /// There is no deadline here; callers wrap this in
    /// `tokio::time::timeout`.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;

        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        tracing::debug!(%id, url, "WebSocket connected");

        let (sink, stream) = ws.split();
        Ok(Self {
            id,
            sink: Mutex::new(Some(sink)),
            stream: Mutex::new(Some(stream)),
        })
    }

    async fn write(&self, msg: Message) -> Result<(), TransportError> {
        let mut guard = self.sink.lock().await;
        let sink = guard.as_mut().ok_or_else(|| {
            TransportError::ConnectionClosed("connection terminated".into())
        })?;
        sink.send(msg).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, text: &str) -> Result<(), Self::Error> {
        self.write(Message::Text(text.to_owned().into())).await
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or_else(|| {
            TransportError::ConnectionClosed("connection terminated".into())
        })?;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(Message::Binary(data))) => {
                    tracing::trace!(
                        id = %self.id,
                        len = data.len(),
                        "skipping binary frame"
                    );
                }
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.write(Message::Close(None)).await
    }

    async fn terminate(&self) {
        // Dropping both halves releases the socket.
        self.sink.lock().await.take();
        self.stream.lock().await.take();
        tracing::debug!(id = %self.id, "WebSocket torn down");
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
