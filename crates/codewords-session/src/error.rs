//! Error types for the session layer.

/// Errors that can occur while managing the local identity.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A display name must contain something other than whitespace.
    #[error("display name must not be empty")]
    EmptyName,

    /// Reading or writing the persisted identity failed.
    #[error("identity store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted identity couldn't be serialized.
    #[error("identity store encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
