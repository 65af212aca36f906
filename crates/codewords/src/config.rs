//! Client configuration: where to connect and how.

use std::fmt;
use std::str::FromStr;

use crate::CodewordsError;

/// The room used when none is given.
pub const DEFAULT_ROOM: &str = "main";

/// Default capacity of the command channel into the room task.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// The origin the client was loaded from: scheme security plus host.
///
/// A secure origin (`https://`) yields `wss://` endpoints, an insecure one
/// (`http://`) yields `ws://`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    secure: bool,
    host: String,
}

impl Origin {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
        }
    }

    /// Parses an origin such as `https://codewords.example:8443`.
    ///
    /// Anything after the host (a path, a query) is ignored.
    ///
    /// # Errors
    /// [`CodewordsError::InvalidOrigin`] if the scheme isn't `http` or
    /// `https`, or the host is empty.
    pub fn parse(origin: &str) -> Result<Self, CodewordsError> {
        let (scheme, rest) = origin
            .split_once("://")
            .ok_or_else(|| CodewordsError::InvalidOrigin(format!("{origin}: missing scheme")))?;

        let secure = match scheme.to_ascii_lowercase().as_str() {
            "https" => true,
            "http" => false,
            other => {
                return Err(CodewordsError::InvalidOrigin(format!(
                    "{origin}: unsupported scheme {other}"
                )));
            }
        };

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() {
            return Err(CodewordsError::InvalidOrigin(format!("{origin}: missing host")));
        }

        Ok(Self::new(host, secure))
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The WebSocket endpoint for `room`: `{ws|wss}://<host>/ws/<room>`.
    pub fn endpoint(&self, room: &str) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{scheme}://{}/ws/{room}", self.host)
    }
}

impl FromStr for Origin {
    type Err = CodewordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { "https" } else { "http" };
        write!(f, "{scheme}://{}", self.host)
    }
}

/// Configuration for a room client.
///
/// Start from [`ClientConfig::new`] (or `Default`, which points at a local
/// development server) and override what you need.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin the endpoint is derived from.
    pub origin: Origin,

    /// Room joined when none is supplied. Default: `"main"`.
    pub default_room: String,

    /// Capacity of the command channel into the room task. Default: 64.
    pub command_capacity: usize,
}

impl ClientConfig {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Sets the room used when none is supplied.
    #[must_use]
    pub fn with_default_room(mut self, room: impl Into<String>) -> Self {
        self.default_room = room.into();
        self
    }

    /// Sets the command channel capacity. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    /// Picks the room to join: `room` if it is non-empty, the default
    /// otherwise.
    pub fn resolve_room(&self, room: Option<&str>) -> String {
        match room {
            Some(room) if !room.trim().is_empty() => room.trim().to_string(),
            _ => self.default_room.clone(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: Origin::new("127.0.0.1:8080", false),
            default_room: DEFAULT_ROOM.to_string(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }
}
