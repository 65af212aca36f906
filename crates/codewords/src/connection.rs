//! Connection lifecycle for one room.
//!
//! [`ConnectionManager`] owns at most one live connection at a time and
//! walks it through `Closed → Connecting → Open → Closed`. The flow is:
//!   1. `setup` derives the endpoint, connects, and announces the known
//!      display name
//!   2. `next_frame` hands inbound frames to the caller until the server
//!      closes or the link errors, which drops the state back to `Closed`
//!   3. `on_focus_regained` reconnects a closed link to the same room
//!   4. `teardown` (or dropping the manager) closes whatever is left

use std::fmt;

use codewords_protocol::{ClientSession, Command, JsonCodec, encode_command};
use codewords_session::{IdentityStore, IdentityTracker, SessionError};
use codewords_transport::{Connection, Connector, TransportError};

use crate::ClientConfig;

/// Where the manager is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No live connection.
    #[default]
    Closed,
    /// A connect attempt is in flight.
    Connecting,
    /// Frames can be sent and received.
    Open,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
        }
    }
}

/// Owns the live connection for one room client.
///
/// All methods take `&mut self`, so a single owner (the room task) drives
/// every transition and the state can't be raced.
pub struct ConnectionManager<C: Connector, S: IdentityStore> {
    connector: C,
    config: ClientConfig,
    identity: IdentityTracker<S>,
    codec: JsonCodec,
    room: String,
    state: ConnectionState,
    conn: Option<C::Connection>,
}

impl<C: Connector, S: IdentityStore> ConnectionManager<C, S> {
    /// Creates a closed manager. Nothing connects until [`setup`](Self::setup).
    pub fn new(connector: C, store: S, config: ClientConfig) -> Self {
        let room = config.default_room.clone();
        Self {
            connector,
            config,
            identity: IdentityTracker::new(store),
            codec: JsonCodec,
            room,
            state: ConnectionState::Closed,
            conn: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// The room this manager is (or was last) connected to.
    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn identity(&self) -> &IdentityTracker<S> {
        &self.identity
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Opens a connection to `room`, or to the default room if `None`.
    ///
    /// Idempotent: returns `Ok(false)` without touching the link when it is
    /// already open. Returns `Ok(true)` when a new connection was opened.
    /// On open, a `SetName` command goes out if a display name is known.
    ///
    /// # Errors
    /// The connector's error. The state is `Closed` afterwards, and a later
    /// [`on_focus_regained`](Self::on_focus_regained) will retry.
    pub async fn setup(&mut self, room: Option<&str>) -> Result<bool, TransportError> {
        let Some(uri) = self.begin_connect(room) else {
            return Ok(false);
        };
        let result = self.connector.connect(&uri).await;
        self.finish_connect(result).await
    }

    /// First half of [`setup`](Self::setup): picks the room and moves to
    /// `Connecting`.
    ///
    /// Returns the endpoint to dial, or `None` if the link is already open.
    /// The caller dials it with [`connector`](Self::connector) and hands the
    /// outcome to [`finish_connect`](Self::finish_connect), or gives up with
    /// [`abort_connect`](Self::abort_connect).
    pub fn begin_connect(&mut self, room: Option<&str>) -> Option<String> {
        if self.state == ConnectionState::Open {
            tracing::debug!(room = %self.room, "already connected, skipping setup");
            return None;
        }

        self.room = self.config.resolve_room(room);
        let uri = self.config.origin.endpoint(&self.room);
        self.conn = None;
        self.state = ConnectionState::Connecting;
        tracing::debug!(%uri, "connecting");
        Some(uri)
    }

    /// Second half of [`setup`](Self::setup): adopts the dialled connection
    /// or falls back to `Closed`.
    pub async fn finish_connect(
        &mut self,
        result: Result<C::Connection, TransportError>,
    ) -> Result<bool, TransportError> {
        let conn = match result {
            Ok(conn) => conn,
            Err(e) => {
                self.state = ConnectionState::Closed;
                tracing::warn!(room = %self.room, error = %e, "connect failed");
                return Err(e);
            }
        };

        tracing::info!(conn_id = %conn.id(), room = %self.room, "connection open");
        self.conn = Some(conn);
        self.state = ConnectionState::Open;
        self.identity.reset_confirmation();

        if let Some(name) = self.identity.name().map(str::to_owned) {
            self.send(&Command::SetName { name }).await;
        }
        Ok(true)
    }

    /// Abandons a connect started with [`begin_connect`](Self::begin_connect).
    pub fn abort_connect(&mut self) {
        if self.state == ConnectionState::Connecting {
            tracing::debug!(room = %self.room, "connect abandoned");
            self.state = ConnectionState::Closed;
        }
    }

    /// Reconnects to the same room if the link has closed.
    ///
    /// Returns `Ok(true)` if a new connection was opened, `Ok(false)` if the
    /// link was already open or connecting.
    pub async fn on_focus_regained(&mut self) -> Result<bool, TransportError> {
        if self.state != ConnectionState::Closed {
            tracing::trace!(state = %self.state, "focus regained, nothing to do");
            return Ok(false);
        }
        tracing::debug!(room = %self.room, "focus regained on a closed link, reconnecting");
        let room = self.room.clone();
        self.setup(Some(&room)).await
    }

    /// Encodes and sends one command. Fire and forget.
    ///
    /// When the link isn't open the command is dropped, never queued. A send
    /// failure marks the link closed.
    pub async fn send(&mut self, command: &Command) {
        let Some(conn) = self.conn.as_ref().filter(|_| self.state == ConnectionState::Open)
        else {
            tracing::debug!(command = command.tag(), state = %self.state, "dropping command, link not open");
            return;
        };

        let frame = match encode_command(&self.codec, command) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(command = command.tag(), error = %e, "failed to encode command");
                return;
            }
        };

        let result = conn.send(&frame).await;
        match result {
            Ok(()) => tracing::trace!(command = command.tag(), "command sent"),
            Err(e) => {
                tracing::debug!(command = command.tag(), error = %e, "send failed");
                self.mark_closed();
            }
        }
    }

    /// Persists a new display name and, if it changed while the link is
    /// open, sends it to the server.
    ///
    /// # Errors
    /// [`SessionError::EmptyName`] for a blank name, or a persistence error.
    pub async fn set_name(&mut self, name: &str) -> Result<bool, SessionError> {
        let changed = self.identity.set_name(name)?;
        if changed {
            if let Some(name) = self.identity.name().map(str::to_owned) {
                self.send(&Command::SetName { name }).await;
            }
        }
        Ok(changed)
    }

    /// Lets the identity tracker see a server-pushed session.
    pub fn observe_session(&mut self, session: &ClientSession) -> bool {
        self.identity.confirm(session)
    }

    /// Waits for the next inbound frame.
    ///
    /// Returns `None` once the link closes or errors; the state is `Closed`
    /// after that. With no live connection this never resolves, which keeps
    /// it usable as a `select!` branch.
    pub async fn next_frame(&mut self) -> Option<Vec<u8>> {
        let Some(conn) = self.conn.as_ref() else {
            return std::future::pending().await;
        };

        let result = conn.recv().await;
        match result {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => {
                tracing::info!(room = %self.room, "connection closed by server");
                self.mark_closed();
                None
            }
            Err(e) => {
                tracing::warn!(room = %self.room, error = %e, "connection lost");
                self.mark_closed();
                None
            }
        }
    }

    /// Closes the live connection, if any. Safe to call in any state.
    pub async fn teardown(&mut self) {
        if let Some(conn) = self.conn.take() {
            let conn_id = conn.id();
            if let Err(e) = conn.close().await {
                tracing::debug!(%conn_id, error = %e, "close failed");
            }
            tracing::info!(%conn_id, "connection torn down");
        }
        self.state = ConnectionState::Closed;
    }

    fn mark_closed(&mut self) {
        self.conn = None;
        self.state = ConnectionState::Closed;
    }
}

/// Closes a connection that outlived its manager.
///
/// `Drop` is synchronous, so the close runs as a fire-and-forget task on
/// the current runtime. Outside a runtime the handle is just dropped.
impl<C: Connector, S: IdentityStore> Drop for ConnectionManager<C, S> {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let _ = conn.close().await;
                });
            }
            Err(_) => tracing::debug!(conn_id = %conn.id(), "no runtime, dropping connection"),
        }
    }
}
