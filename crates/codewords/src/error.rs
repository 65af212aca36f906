//! Unified error type for the Codewords room client.

use codewords_protocol::ProtocolError;
use codewords_session::SessionError;
use codewords_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CodewordsError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (blank name, identity persistence).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The page origin couldn't be turned into an endpoint.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),

    /// The room client's task has stopped; nothing more can be sent to it.
    #[error("room client has shut down")]
    ClientClosed,
}
