//! In-process transport backed by Tokio channels.
//!
//! [`MemoryConnector::new`] returns the connector together with a receiver
//! of [`MemoryPeer`]s. Every successful `connect` hands the server side of
//! the new connection to that receiver, so a test can act as the room
//! server: read the commands the client sends and push event frames back.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::{Connection, ConnectionId, Connector, TransportError};

/// Connector producing [`MemoryConnection`]s.
#[derive(Clone)]
pub struct MemoryConnector {
    peers: mpsc::UnboundedSender<MemoryPeer>,
    refuse: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl MemoryConnector {
    /// Creates a connector and the receiver on which server-side peers of
    /// new connections are delivered.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MemoryPeer>) {
        let (peers, rx) = mpsc::unbounded_channel();
        let connector = Self {
            peers,
            refuse: Arc::new(AtomicBool::new(false)),
            attempts: Arc::new(AtomicUsize::new(0)),
        };
        (connector, rx)
    }

    /// Makes subsequent `connect` calls fail, as if the server were down.
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Number of `connect` calls made so far, successful or not.
    pub fn connect_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;

    async fn connect(
        &self,
        uri: &str,
    ) -> Result<Self::Connection, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("refused connection to {uri}"),
            )));
        }

        let (to_client, from_server) = mpsc::unbounded_channel();
        let (to_server, from_client) = mpsc::unbounded_channel();
        let id = ConnectionId::next();

        let peer = MemoryPeer {
            id,
            uri: uri.to_string(),
            to_client: Some(to_client),
            from_client,
        };
        self.peers.send(peer).map_err(|_| {
            TransportError::ConnectFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "no server listening",
            ))
        })?;

        Ok(MemoryConnection {
            id,
            to_server: Mutex::new(Some(to_server)),
            from_server: Mutex::new(from_server),
        })
    }
}

/// Client side of an in-memory connection.
pub struct MemoryConnection {
    id: ConnectionId,
    to_server: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    from_server: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl Connection for MemoryConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        let guard = self.to_server.lock().await;
        let Some(tx) = guard.as_ref() else {
            return Err(TransportError::ConnectionClosed(
                "closed locally".into(),
            ));
        };
        tx.send(data.to_vec()).map_err(|_| {
            TransportError::ConnectionClosed("server hung up".into())
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.from_server.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.to_server.lock().await.take();
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Server side of an in-memory connection.
pub struct MemoryPeer {
    id: ConnectionId,
    uri: String,
    to_client: Option<mpsc::UnboundedSender<Vec<u8>>>,
    from_client: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl MemoryPeer {
    /// Id of the client connection this peer is paired with.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The endpoint URI the client dialled.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Pushes a frame to the client. Returns `false` once the client is gone.
    pub fn send(&self, data: impl Into<Vec<u8>>) -> bool {
        match &self.to_client {
            Some(tx) => tx.send(data.into()).is_ok(),
            None => false,
        }
    }

    /// Waits for the next frame from the client; `None` once it closed.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.from_client.recv().await
    }

    /// Returns a frame the client already sent, without waiting.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.from_client.try_recv().ok()
    }

    /// Closes the server side; the client observes a clean close.
    pub fn close(&mut self) {
        self.to_client.take();
    }
}
