//! Authentication DTOs.

use crate::domain::entities::Session;
use crate::domain::ports::Credentials;

/// Where a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    /// Restored from the session store.
    Stored,
    /// Credential passed on the command line or environment.
    CommandLine,
    /// Credentials typed by the user.
    UserInput,
}

impl SessionSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Stored => "session store",
            Self::CommandLine => "command line / environment",
            Self::UserInput => "user input",
        }
    }
}

impl std::fmt::Display for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login request data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Identifier and password.
    pub credentials: Credentials,
    /// Whether to persist the session.
    pub persist: bool,
}

impl LoginRequest {
    /// Creates new login request with persistence enabled.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            persist: true,
        }
    }

    /// Disables session persistence.
    #[must_use]
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Established session.
    pub session: Session,
    /// Origin of the session.
    pub source: SessionSource,
    /// Whether the session was persisted.
    pub persisted: bool,
}

impl LoginResponse {
    /// Creates new login response.
    #[must_use]
    pub const fn new(session: Session, source: SessionSource, persisted: bool) -> Self {
        Self {
            session,
            source,
            persisted,
        }
    }
}

/// Result of a registration.
#[derive(Debug, Clone)]
pub struct RegisterResponse {
    /// Backend confirmation message.
    pub message: String,
    /// Session when the new account was signed in.
    pub session: Option<Session>,
}
