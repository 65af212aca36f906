//! Wire protocol for Codewords.
//!
//! This crate defines the "language" the room client and the game server
//! speak:
//!
//! - **Types** ([`Game`], [`Card`], [`ClientSession`], [`Command`],
//!   [`Event`], [`EventMessage`]): the data model and the two closed
//!   message unions that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to/from bytes.
//! - **Frames** ([`encode_command`], [`decode_event`], [`decode_command`]) -
//!   whole-frame encoding and decoding with the recoverable failure
//!   taxonomy in [`ProtocolError`].
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (EventMessage / Command) → Reducer (Game)
//! ```

mod codec;
mod error;
mod frame;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use frame::{decode_command, decode_event, encode_command, encode_event};
pub use types::{
    Board, Card, CardType, ClientSession, Command, Coord, Event, EventMessage,
    Game, GameStatus, RemainingCards, Team,
};
