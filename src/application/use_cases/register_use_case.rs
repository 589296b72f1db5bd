//! Registration use case implementation.

use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, RegisterResponse};
use crate::application::use_cases::LoginUseCase;
use crate::domain::entities::Role;
use crate::domain::errors::ClientError;
use crate::domain::ports::{AuthPort, RegistrationRequest};
use std::sync::Arc;

/// Creates accounts and signs new patients in.
#[derive(Clone)]
pub struct RegisterUseCase {
    auth_port: Arc<dyn AuthPort>,
    login: LoginUseCase,
}

impl RegisterUseCase {
    /// Creates new register use case.
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>, login: LoginUseCase) -> Self {
        Self { auth_port, login }
    }

    /// Registers an account.
    ///
    /// The backend returns no credential on registration, so patient
    /// accounts are signed in with the submitted credentials. If that
    /// sign-in fails the account still exists and the response carries no
    /// session.
    ///
    /// # Errors
    /// Returns error if the backend refuses the registration.
    pub async fn execute(
        &self,
        request: &RegistrationRequest,
        persist: bool,
    ) -> Result<RegisterResponse, ClientError> {
        debug!(
            identifier_type = request.identifier_type.code(),
            role = %request.role,
            "Registering account"
        );

        let receipt = self
            .auth_port
            .register(request)
            .await
            .inspect_err(|e| warn!(error = %e, "Registration failed"))?;

        info!(user_id = ?receipt.user_id, "Account registered");

        let session = match receipt.session {
            Some(session) => {
                self.login.persist(&session, persist).await;
                Some(session)
            }
            None if request.role == Role::Patient => {
                let mut login_request = LoginRequest::new(request.credentials());
                login_request.persist = persist;
                match self.login.execute(login_request).await {
                    Ok(response) => Some(response.session),
                    Err(e) => {
                        warn!(error = %e, "Sign-in after registration failed");
                        None
                    }
                }
            }
            None => None,
        };

        Ok(RegisterResponse {
            message: receipt.message,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::IdentityType;
    use crate::domain::ports::SessionStoragePort;
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStorage};

    fn request(role: Role) -> RegistrationRequest {
        RegistrationRequest {
            identifier: "8001015009087".to_string(),
            identifier_type: IdentityType::NationalId,
            first_name: "Thandi".to_string(),
            last_name: "Mokoena".to_string(),
            phone: "0821234567".to_string(),
            password: "secret1".to_string(),
            role,
            language: "English".to_string(),
        }
    }

    fn use_case(auth: Arc<MockAuthPort>, storage: Arc<MockSessionStorage>) -> RegisterUseCase {
        RegisterUseCase::new(auth.clone(), LoginUseCase::new(auth, storage))
    }

    #[tokio::test]
    async fn test_patient_registration_signs_in() {
        let auth = Arc::new(MockAuthPort::new(true, Role::Patient));
        let storage = Arc::new(MockSessionStorage::new());

        let response = use_case(auth.clone(), storage.clone())
            .execute(&request(Role::Patient), true)
            .await
            .unwrap();

        assert_eq!(response.session.map(|s| s.role()), Some(Role::Patient));
        assert_eq!(auth.register_calls(), 1);
        assert_eq!(auth.login_calls(), 1);
        assert!(storage.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_staff_registration_does_not_sign_in() {
        let auth = Arc::new(MockAuthPort::new(true, Role::Staff));
        let storage = Arc::new(MockSessionStorage::new());

        let response = use_case(auth.clone(), storage)
            .execute(&request(Role::Staff), true)
            .await
            .unwrap();

        assert!(response.session.is_none());
        assert_eq!(auth.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_refused_registration() {
        let auth = Arc::new(MockAuthPort::new(false, Role::Patient));
        let storage = Arc::new(MockSessionStorage::new());

        let result = use_case(auth.clone(), storage)
            .execute(&request(Role::Patient), true)
            .await;

        assert_eq!(
            result.unwrap_err().user_message(),
            "Identifier already registered"
        );
        assert_eq!(auth.login_calls(), 0);
    }
}
