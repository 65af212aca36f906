//! Integration tests for the WebSocket connector.
//!
//! A real tokio-tungstenite server is started on an OS-assigned port and
//! the connector dials it, so frames actually cross a socket.

#[cfg(feature = "websocket")]
mod websocket {
    use codewords_transport::{Connection, Connector, WebSocketConnector};
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener and returns it with the `ws://` URI to dial.
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("ws://{addr}/ws/main"))
    }

    async fn accept(listener: TcpListener) -> ServerWs {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    }

    #[tokio::test]
    async fn test_connect_send_and_receive() {
        let (listener, uri) = listen().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnector
            .connect(&uri)
            .await
            .expect("client should connect");
        let mut server_ws = server.await.expect("task should complete");

        assert!(conn.id().into_inner() > 0);

        // --- Client sends, server receives a text frame ---
        conn.send(br#"{"type":"nextTurn","data":{}}"#)
            .await
            .expect("send should succeed");
        let msg = server_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text());
        assert_eq!(msg.into_text().unwrap().as_str(), r#"{"type":"nextTurn","data":{}}"#);

        // --- Server sends, client receives ---
        server_ws
            .send(Message::text("hello from server"))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"hello from server");

        // Binary frames are accepted too.
        server_ws
            .send(Message::Binary(b"bytes".to_vec().into()))
            .await
            .unwrap();
        let received = conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"bytes");

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_server_close() {
        let (listener, uri) = listen().await;
        let server = tokio::spawn(accept(listener));

        let conn = WebSocketConnector.connect(&uri).await.unwrap();
        let mut server_ws = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let (listener, uri) = listen().await;
        drop(listener);

        let result = WebSocketConnector.connect(&uri).await;
        assert!(result.is_err());
    }
}
