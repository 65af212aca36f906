//! Tracks the locally chosen display name against what the server reports.

use codewords_protocol::ClientSession;

use crate::{IdentityStore, SessionError};

/// The client's view of "who am I" before the server says so.
///
/// ```text
///   load/set_name ──→ [pending] ──(session with same username)──→ [confirmed]
///                         ↑                                             │
///                         └──────────(new connection / new name)────────┘
/// ```
///
/// Only the name lives here. The id and the spymaster flag are read from
/// the server-pushed session and never guessed locally.
pub struct IdentityTracker<S: IdentityStore> {
    store: S,
    name: Option<String>,
    confirmed: bool,
}

impl<S: IdentityStore> IdentityTracker<S> {
    /// Creates a tracker seeded with whatever name `store` has persisted.
    pub fn new(store: S) -> Self {
        let name = store.load();
        if let Some(name) = &name {
            tracing::debug!(%name, "loaded persisted display name");
        }
        Self {
            store,
            name,
            confirmed: false,
        }
    }

    /// The known display name, confirmed or not.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` once the server has echoed the current name back.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Stores a new display name.
    ///
    /// Returns `Ok(true)` if the name changed and should be sent to the
    /// server, `Ok(false)` if it is the name we already had.
    ///
    /// # Errors
    /// - [`SessionError::EmptyName`] for a blank name
    /// - any error from persisting it
    pub fn set_name(&mut self, name: &str) -> Result<bool, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if self.name.as_deref() == Some(name) {
            return Ok(false);
        }

        self.store.save(name)?;
        tracing::info!(%name, "display name changed");
        self.name = Some(name.to_string());
        self.confirmed = false;
        Ok(true)
    }

    /// Checks a server-pushed session against the pending name.
    ///
    /// Returns `true` if this session confirms it.
    pub fn confirm(&mut self, session: &ClientSession) -> bool {
        let matches = self.name.as_deref() == Some(session.username.as_str());
        if matches && !self.confirmed {
            tracing::debug!(id = session.id, name = %session.username, "display name confirmed");
            self.confirmed = true;
        }
        matches
    }

    /// Forgets any confirmation; a fresh connection starts unidentified.
    pub fn reset_confirmation(&mut self) {
        self.confirmed = false;
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
