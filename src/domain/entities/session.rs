//! Authenticated session.

use super::{BearerToken, Principal, Role};

/// A principal together with the credential that proves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    principal: Principal,
    token: BearerToken,
}

impl Session {
    /// Pairs `principal` with its credential.
    #[must_use]
    pub const fn new(principal: Principal, token: BearerToken) -> Self {
        Self { principal, token }
    }

    /// Signed-in user.
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Bearer credential.
    #[must_use]
    pub const fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Role of the principal.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.principal.role()
    }

    /// Consumes the session, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (Principal, BearerToken) {
        (self.principal, self.token)
    }
}

/// Credential context attached to an outgoing backend call.
///
/// Guests call the backend without a credential; signed-in users always
/// send theirs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    token: Option<BearerToken>,
}

impl AuthContext {
    /// Context for unauthenticated calls.
    #[must_use]
    pub const fn guest() -> Self {
        Self { token: None }
    }

    /// Context carrying a bearer credential.
    #[must_use]
    pub const fn bearer(token: BearerToken) -> Self {
        Self { token: Some(token) }
    }

    /// Builds the context for an optional session.
    #[must_use]
    pub fn for_session(session: Option<&Session>) -> Self {
        session.map_or_else(Self::guest, |s| Self::bearer(s.token().clone()))
    }

    /// Credential to send, if any.
    #[must_use]
    pub const fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// True when calls go out without a credential.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.token.is_none()
    }
}
