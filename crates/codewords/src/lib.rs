//! # Codewords
//!
//! Realtime room client for a Codewords party game.
//!
//! The server owns the game. This crate keeps one connection to a room,
//! folds the server's event stream into local state, and turns user intents
//! into commands:
//!
//! ```text
//!   ConnectionManager ──frame──→ decode_event ──→ GameReducer ──→ RoomView
//!          ↑                                                        │
//!          └────── encode_command ←── encode_intent ←── Intent ←────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use codewords::prelude::*;
//!
//! # async fn run() -> Result<(), CodewordsError> {
//! let config = ClientConfig::new(Origin::parse("http://localhost:8080")?);
//! let client = RoomClient::spawn(
//!     WebSocketConnector,
//!     MemoryIdentityStore::with_name("ana"),
//!     config,
//!     Some("lobby"),
//! );
//! client.intent(Intent::SendChat("hello".into())).await?;
//! client.shutdown().await
//! # }
//! ```

mod client;
mod config;
mod connection;
mod error;
mod intent;

pub use client::{RoomClient, RoomView};
pub use config::{ClientConfig, DEFAULT_COMMAND_CAPACITY, DEFAULT_ROOM, Origin};
pub use connection::{ConnectionManager, ConnectionState};
pub use error::CodewordsError;
pub use intent::{Intent, encode_intent};

pub use codewords_game as game;
pub use codewords_protocol as protocol;
pub use codewords_session as session;
pub use codewords_transport as transport;

/// Everything needed to run a room client.
pub mod prelude {
    pub use crate::{
        ClientConfig, CodewordsError, ConnectionManager, ConnectionState, Intent, Origin,
        RoomClient, RoomView,
    };
    pub use codewords_game::{CardColor, Fragment, Notification, StyleHint};
    pub use codewords_protocol::{Card, CardType, ClientSession, Coord, Game, GameStatus, Team};
    pub use codewords_session::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
    pub use codewords_transport::{Connection, Connector};
    #[cfg(feature = "websocket")]
    pub use codewords_transport::{WebSocketConnection, WebSocketConnector};
}
