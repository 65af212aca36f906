//! Client-side game state for Codewords.
//!
//! The server is authoritative: it pushes whole [`Game`] snapshots and
//! small events describing what happened. This crate folds those events,
//! one at a time and in arrival order, into the local state a renderer
//! reads.
//!
//! # Key types
//!
//! - [`GameReducer`]: owns the last applied game, the server-confirmed
//!   session and the notification log
//! - [`Notification`]: one renderer-agnostic log entry
//! - [`resolve_color`] and friends: pure functions deriving what a viewer
//!   may see
//!
//! [`Game`]: codewords_protocol::Game

mod notification;
mod reducer;
mod view;

pub use notification::{Fragment, Notification, StyleHint};
pub use reducer::GameReducer;
pub use view::{
    CardColor, can_flip, is_game_over, is_spymaster, resolve_color, text_color,
};
