//! Login and logout use case implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse, SessionSource};
use crate::domain::entities::Session;
use crate::domain::errors::ClientError;
use crate::domain::ports::{AuthPort, SessionStoragePort};

/// Handles sign-in and sign-out.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn SessionStoragePort>,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
        }
    }

    /// Exchanges credentials for a session and optionally persists it.
    ///
    /// # Errors
    /// Returns error if the backend rejects the credentials or cannot be
    /// reached. A persistence failure is logged, not returned.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, ClientError> {
        debug!(identifier = %request.credentials.identifier(), "Attempting login");

        let session = self
            .auth_port
            .login(&request.credentials)
            .await
            .inspect_err(|e| warn!(error = %e, "Login failed"))?;

        info!(
            identifier = %session.principal().identifier(),
            role = %session.role(),
            "Successfully authenticated"
        );

        let persisted = self.persist(&session, request.persist).await;
        Ok(LoginResponse::new(session, SessionSource::UserInput, persisted))
    }

    /// Saves `session` when `enabled`. Returns whether it was saved.
    pub(crate) async fn persist(&self, session: &Session, enabled: bool) -> bool {
        if !enabled {
            debug!("Session persistence disabled, skipping storage");
            return false;
        }

        match self.storage_port.store_session(session).await {
            Ok(()) => {
                info!("Session persisted");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to persist session");
                false
            }
        }
    }

    /// Clears the persisted session.
    ///
    /// # Errors
    /// Returns error if the session store cannot be cleared.
    pub async fn logout(&self) -> Result<(), ClientError> {
        debug!("Clearing persisted session");
        match self.storage_port.clear_session().await {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to clear persisted session");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::ports::Credentials;
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStorage};

    fn request() -> LoginRequest {
        LoginRequest::new(Credentials::new("8001015009087", "x"))
    }

    #[tokio::test]
    async fn test_successful_login() {
        let auth_port = Arc::new(MockAuthPort::new(true, Role::Patient));
        let storage_port = Arc::new(MockSessionStorage::new());

        let use_case = LoginUseCase::new(auth_port, storage_port.clone());
        let response = use_case.execute(request()).await.unwrap();

        assert_eq!(response.session.role(), Role::Patient);
        assert_eq!(response.source, SessionSource::UserInput);
        assert!(response.persisted);
        assert!(storage_port.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let auth_port = Arc::new(MockAuthPort::new(false, Role::Patient));
        let storage_port = Arc::new(MockSessionStorage::new());

        let use_case = LoginUseCase::new(auth_port, storage_port.clone());
        let result = use_case.execute(request()).await;

        assert!(matches!(result, Err(ClientError::Unauthorized { .. })));
        assert!(!storage_port.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_login_without_persistence() {
        let auth_port = Arc::new(MockAuthPort::new(true, Role::Staff));
        let storage_port = Arc::new(MockSessionStorage::new());

        let use_case = LoginUseCase::new(auth_port, storage_port.clone());
        let response = use_case
            .execute(request().without_persistence())
            .await
            .unwrap();

        assert!(!response.persisted);
        assert!(!storage_port.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_clears_store() {
        let auth_port = Arc::new(MockAuthPort::new(true, Role::Admin));
        let storage_port = Arc::new(MockSessionStorage::new());

        let use_case = LoginUseCase::new(auth_port, storage_port.clone());
        use_case.execute(request()).await.unwrap();
        use_case.logout().await.unwrap();

        assert_eq!(storage_port.slots().await, (None, None));
    }
}
