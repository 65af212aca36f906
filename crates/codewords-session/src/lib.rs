//! Local identity for the Codewords room client.
//!
//! The server decides who a connection is: its numeric id and whether it is
//! the spymaster only ever come from a pushed
//! [`ClientSession`](codewords_protocol::ClientSession). What the client
//! owns is the display name the user typed, which must survive restarts:
//!
//! 1. **Persistence**: the [`IdentityStore`] trait, with an in-memory and
//!    a file-backed implementation
//! 2. **Tracking**: [`IdentityTracker`] holds the pending name, knows when
//!    it must be (re)sent, and notices when the server has confirmed it
//!
//! # How it fits in the stack
//!
//! ```text
//! Connection manager (above)  ← sends SetName at open and on change
//!     ↕
//! Session layer (this crate)  ← name persistence and confirmation
//!     ↕
//! Protocol layer (below)      ← ClientSession type
//! ```

mod error;
mod store;
mod tracker;

pub use error::SessionError;
pub use store::{FileIdentityStore, IdentityStore, MemoryIdentityStore};
pub use tracker::IdentityTracker;
