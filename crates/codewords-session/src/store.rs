//! Persistence for the user's chosen display name.
//!
//! The room client reads the name when a connection opens and writes it when
//! the user submits a new one. Where it lives is up to the [`IdentityStore`]
//! implementation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::SessionError;

/// How long a persisted name stays valid: far enough in the future that
/// it effectively never expires.
pub const DEFAULT_IDENTITY_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Gets and sets a persisted display name.
///
/// `Send + Sync + 'static` because the store is owned by the room client's
/// task for as long as the room is mounted.
pub trait IdentityStore: Send + Sync + 'static {
    /// Returns the persisted name, if one is set and still valid.
    fn load(&self) -> Option<String>;

    /// Persists `name`, replacing any previous value.
    fn save(&self, name: &str) -> Result<(), SessionError>;
}

impl<T: IdentityStore> IdentityStore for Arc<T> {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, name: &str) -> Result<(), SessionError> {
        (**self).save(name)
    }
}

// ---------------------------------------------------------------------------
// MemoryIdentityStore
// ---------------------------------------------------------------------------

/// Keeps the name in memory only. Useful for tests and throwaway clients.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    name: Mutex<Option<String>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `name`, as if it had been persisted by an
    /// earlier run.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Mutex::new(Some(name.into())),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Option<String> {
        self.name
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, name: &str) -> Result<(), SessionError> {
        *self
            .name
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(name.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileIdentityStore
// ---------------------------------------------------------------------------

/// On-disk record: the name plus the unix time after which it is ignored.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedIdentity {
    name: String,
    expires_at: u64,
}

/// Keeps the name in a small JSON file so it survives restarts.
///
/// A missing, unreadable, corrupt or expired file reads as "no name".
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
    ttl: Duration,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_IDENTITY_TTL,
        }
    }

    /// Overrides how long a saved name stays valid.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Option<String> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read identity");
                return None;
            }
        };

        let record: PersistedIdentity = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt identity file");
                return None;
            }
        };

        if record.expires_at <= unix_now() {
            tracing::debug!(path = %self.path.display(), "persisted identity expired");
            return None;
        }
        Some(record.name)
    }

    fn save(&self, name: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let record = PersistedIdentity {
            name: name.to_string(),
            expires_at: unix_now().saturating_add(self.ttl.as_secs()),
        };
        std::fs::write(&self.path, serde_json::to_vec(&record)?)?;
        tracing::debug!(path = %self.path.display(), "identity saved");
        Ok(())
    }
}
