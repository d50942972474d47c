//! The session snapshot and its status.
//!
//! ```text
//!   Unknown ──(verify issued)──→ Authenticating ──(ok)──→ Authenticated
//!      │                              │                        │
//!      └──(no token | failure)────────┴──→ Unauthenticated ←───┘ (logout / expiry)
//!                                             │
//!                                             └──(login ok)──→ Authenticated
//! ```

use serde::Serialize;

use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// A token was found on disk but has not been checked yet.
    Unknown,
    /// The stored token is being verified against the backend.
    Authenticating,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    /// Whether the status is still waiting on startup verification.
    pub fn is_pending(self) -> bool {
        matches!(self, SessionStatus::Unknown | SessionStatus::Authenticating)
    }
}

/// Snapshot of the authentication state.
///
/// Fields are private so that a user is present exactly when the status is
/// `Authenticated`, and an authenticated session always has a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
    status: SessionStatus,
}

impl Session {
    pub fn unknown(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
            status: SessionStatus::Unknown,
        }
    }

    pub fn authenticating(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
            status: SessionStatus::Authenticating,
        }
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            status: SessionStatus::Authenticated,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            token: None,
            user: None,
            status: SessionStatus::Unauthenticated,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}
