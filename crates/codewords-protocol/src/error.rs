//! Error types for the protocol layer.
//!
//! Every decode failure here is recoverable: the caller logs it, drops the
//! frame and keeps whatever state it had before.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not well-formed structured data, or its payload does
    /// not have the shape its tag promises.
    #[cfg(feature = "json")]
    #[error("malformed frame: {0}")]
    MalformedFrame(serde_json::Error),

    /// The frame is well-formed but its event `type` is not one we know.
    #[error("unknown event type: {0}")]
    UnknownEventType(String),

    /// The frame is well-formed but its command `type` is not one we know.
    #[error("unknown command type: {0}")]
    UnknownCommandType(String),

    /// The frame decodes but violates a data-model rule, e.g. a board whose
    /// card coordinates don't match their position.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl ProtocolError {
    /// Returns the short name of the failure class, for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            #[cfg(feature = "json")]
            Self::Encode(_) => "encode",
            #[cfg(feature = "json")]
            Self::MalformedFrame(_) => "malformed_frame",
            Self::UnknownEventType(_) => "unknown_event_type",
            Self::UnknownCommandType(_) => "unknown_command_type",
            Self::InvalidMessage(_) => "invalid_message",
        }
    }
}
