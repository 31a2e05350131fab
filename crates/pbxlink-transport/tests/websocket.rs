//! Integration tests for the WebSocket client transport.
//!
//! These tests spin up a real WebSocket server on a loopback port and dial
//! it with [`WebSocketConnection`], so frames really cross the network.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use pbxlink_transport::{Connection, TransportError, WebSocketConnection};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its `ws://` URL.
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}/call"))
    }

    async fn accept(listener: &TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn test_connect_send_and_receive_text() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let msg = ws.next().await.unwrap().unwrap();
            assert_eq!(msg.into_text().unwrap().as_str(), r#"{"command":"pause"}"#);
            ws.send(Message::Text(r#"{"event":"answer"}"#.to_owned().into()))
                .await
                .unwrap();
            ws
        });

        let conn = WebSocketConnection::connect(&url)
            .await
            .expect("client should connect");
        assert!(conn.id().into_inner() > 0);

        conn.send(r#"{"command":"pause"}"#).await.expect("send");
        let frame = conn.recv().await.expect("recv").expect("frame");
        assert_eq!(frame, r#"{"event":"answer"}"#);

        let _ws = server.await.unwrap();
    }

    #[tokio::test]
    async fn test_binary_frames_are_skipped() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            ws.send(Message::Binary(vec![0u8, 1, 2].into())).await.unwrap();
            ws.send(Message::Text(r#"{"event":"ringing"}"#.to_owned().into()))
                .await
                .unwrap();
            ws
        });

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let frame = conn.recv().await.unwrap().unwrap();
        assert_eq!(frame, r#"{"event":"ringing"}"#);
        let _ws = server.await.unwrap();
    }

    #[tokio::test]
    async fn test_close_handshake_ends_recv_with_none() {
        let (listener, url) = listen().await;
        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            // Drain until the client's close frame; tungstenite replies
            // to it automatically.
            while let Some(Ok(msg)) = ws.next().await {
                if msg.is_close() {
                    break;
                }
            }
        });

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        conn.close().await.expect("close frame should be sent");

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None after close ack");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_server_close() {
        let (listener, url) = listen().await;
        tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            ws.send(Message::Close(None)).await.unwrap();
        });

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_send_after_terminate_fails() {
        let (listener, url) = listen().await;
        tokio::spawn(async move {
            let _ws = accept(&listener).await;
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        });

        let conn = WebSocketConnection::connect(&url).await.unwrap();
        conn.terminate().await;

        let err = conn.send("{}").await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectionClosed(_)));
        let err = conn.recv().await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectionClosed(_)));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        // Bind then drop to get a port nobody listens on.
        let (listener, url) = listen().await;
        drop(listener);

        let err = WebSocketConnection::connect(&url).await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectFailed(_)));
    }
}
