//! Explicit session context.
//!
//! The console's session state (signed-in user, role, API token) is passed
//! to whatever needs it rather than living in an ambient singleton. Init is
//! hydration from the persisted credentials file; teardown is an explicit
//! [`Session::clear`].

use std::fs;
use std::path::Path;

use backstock_core::{Role, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur loading or persisting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be read or written.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The session file is not valid JSON.
    #[error("session format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// A signed-in console user and their API credential.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    user_id: UserId,
    display_name: String,
    role: Role,
    token: SecretString,
}

/// On-disk form of a session. The file lives in the user's profile
/// directory; at-rest protection is the operating system's concern.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    user_id: UserId,
    display_name: String,
    role: Role,
    token: String,
}

impl Session {
    /// Create a session from freshly issued credentials (i.e., after login,
    /// which is handled outside this subsystem).
    #[must_use]
    pub fn new(
        user_id: UserId,
        display_name: impl Into<String>,
        role: Role,
        token: SecretString,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role,
            token,
        }
    }

    /// Hydrate a session from the persisted credentials file.
    ///
    /// Returns `Ok(None)` if no session has been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn hydrate(path: &Path) -> Result<Option<Self>, SessionError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let stored: StoredSession = serde_json::from_str(&raw)?;
        Ok(Some(Self {
            user_id: stored.user_id,
            display_name: stored.display_name,
            role: stored.role,
            token: SecretString::from(stored.token),
        }))
    }

    /// Persist the session so a later launch can hydrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn persist(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredSession {
            user_id: self.user_id.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            token: self.token.expose_secret().to_owned(),
        };
        fs::write(path, serde_json::to_string(&stored)?)?;
        Ok(())
    }

    /// Tear down the persisted session (sign-out).
    ///
    /// Removing a file that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(path: &Path) -> Result<(), SessionError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The signed-in user's ID.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The signed-in user's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The signed-in user's console role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// The API token for backend requests.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
