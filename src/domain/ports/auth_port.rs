//! Authentication port definition.

use std::fmt;

use async_trait::async_trait;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::entities::{AuthContext, BearerToken, IdentityType, Principal, Role, Session};
use crate::domain::errors::ClientError;

/// Identifier/password pair submitted to the authentication service.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    /// Pairs an identifier with its password.
    #[must_use]
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    /// Id or passport number.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Plain password. Zeroed when dropped.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated registration payload.
#[derive(Clone)]
#[allow(missing_docs)]
pub struct RegistrationRequest {
    pub identifier: String,
    pub identifier_type: IdentityType,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    pub language: String,
}

impl RegistrationRequest {
    /// Credentials that sign in to the account being created.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.identifier.clone(), self.password.clone())
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("identifier", &self.identifier)
            .field("identifier_type", &self.identifier_type)
            .field("role", &self.role)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    /// Backend id of the new account, when reported.
    pub user_id: Option<String>,
    /// Confirmation message from the backend.
    pub message: String,
    /// Session, when the backend signs the user in directly.
    pub session: Option<Session>,
}

/// Port for the authentication service.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError>;

    /// Creates an account.
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationReceipt, ClientError>;

    /// Fetches the principal that owns `token`.
    async fn current_user(&self, token: &BearerToken) -> Result<Principal, ClientError>;

    /// Lists accounts. Admin only.
    async fn list_users(&self, auth: &AuthContext) -> Result<Vec<Principal>, ClientError>;

    /// Checks backend availability.
    async fn health_check(&self) -> Result<(), ClientError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock authentication port for testing.
    pub struct MockAuthPort {
        should_succeed: Arc<AtomicBool>,
        role: Role,
        login_calls: Arc<AtomicUsize>,
        register_calls: Arc<AtomicUsize>,
    }

    impl MockAuthPort {
        /// Creates new mock issuing sessions for `role`.
        pub fn new(should_succeed: bool, role: Role) -> Self {
            Self {
                should_succeed: Arc::new(AtomicBool::new(should_succeed)),
                role,
                login_calls: Arc::new(AtomicUsize::new(0)),
                register_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Sets success behavior.
        pub fn set_should_succeed(&self, value: bool) {
            self.should_succeed.store(value, Ordering::SeqCst);
        }

        /// Number of login calls received.
        pub fn login_calls(&self) -> usize {
            self.login_calls.load(Ordering::SeqCst)
        }

        /// Number of register calls received.
        pub fn register_calls(&self) -> usize {
            self.register_calls.load(Ordering::SeqCst)
        }

        fn session_for(&self, identifier: &str) -> Session {
            Session::new(
                Principal::new(identifier, self.role).with_name("Test", "User"),
                BearerToken::new_unchecked(format!("mock_jwt_{identifier}")),
            )
        }
    }

    #[async_trait]
    impl AuthPort for MockAuthPort {
        async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(self.session_for(credentials.identifier()))
            } else {
                Err(ClientError::unauthorized("Invalid identifier or password"))
            }
        }

        async fn register(
            &self,
            _request: &RegistrationRequest,
        ) -> Result<RegistrationReceipt, ClientError> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(RegistrationReceipt {
                    user_id: Some("1".to_string()),
                    message: "User registered successfully".to_string(),
                    session: None,
                })
            } else {
                Err(ClientError::server(400, "Identifier already registered"))
            }
        }

        async fn current_user(&self, _token: &BearerToken) -> Result<Principal, ClientError> {
            if self.should_succeed.load(Ordering::SeqCst) {
                Ok(Principal::new("8001015009087", self.role))
            } else {
                Err(ClientError::unauthorized("invalid token"))
            }
        }

        async fn list_users(&self, _auth: &AuthContext) -> Result<Vec<Principal>, ClientError> {
            Ok(vec![Principal::new("8001015009087", Role::Patient)])
        }

        async fn health_check(&self) -> Result<(), ClientError> {
            Ok(())
        }
    }
}
