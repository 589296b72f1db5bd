use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use super::client::ApiClient;
use super::dto::{LoginBody, RegisterBody, RegisterResponse, TokenResponse};
use crate::domain::entities::{AuthContext, BearerToken, Principal, Session};
use crate::domain::errors::ClientError;
use crate::domain::ports::{AuthPort, Credentials, RegistrationReceipt, RegistrationRequest};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const ME_PATH: &str = "/auth/me";
const USERS_PATH: &str = "/auth/users";
const HEALTH_PATH: &str = "/health";

fn session_from(token: &str, user: Principal) -> Result<Session, ClientError> {
    let token = BearerToken::new(token)
        .ok_or_else(|| ClientError::decode("backend issued an empty access token"))?;
    Ok(Session::new(user, token))
}

#[async_trait]
impl AuthPort for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let body = LoginBody {
            identifier: credentials.identifier(),
            password: credentials.password(),
        };
        let request = self.request_json(Method::POST, LOGIN_PATH, &AuthContext::guest(), &body);
        let response: TokenResponse = self.send_json(request, LOGIN_PATH).await?;

        let session = session_from(&response.access_token, response.user)?;
        info!(role = %session.role(), "Signed in");
        Ok(session)
    }

    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationReceipt, ClientError> {
        let body = RegisterBody::from(request);
        let builder = self.request_json(Method::POST, REGISTER_PATH, &AuthContext::guest(), &body);
        let response: RegisterResponse = self.send_json(builder, REGISTER_PATH).await?;

        let user_id = response.user_id();
        let session = match (response.access_token, response.user) {
            (Some(token), Some(user)) => Some(session_from(&token, user)?),
            _ => None,
        };
        info!(role = %request.role, user_id = ?user_id, "Registered account");

        Ok(RegistrationReceipt {
            user_id,
            message: response
                .message
                .unwrap_or_else(|| "Registration successful".to_string()),
            session,
        })
    }

    async fn current_user(&self, token: &BearerToken) -> Result<Principal, ClientError> {
        let auth = AuthContext::bearer(token.clone());
        let request = self.request(Method::GET, ME_PATH, &auth);
        self.send_json(request, ME_PATH).await
    }

    async fn list_users(&self, auth: &AuthContext) -> Result<Vec<Principal>, ClientError> {
        let request = self.request(Method::GET, USERS_PATH, auth);
        self.send_json(request, USERS_PATH).await
    }

    async fn health_check(&self) -> Result<(), ClientError> {
        let request = self.request(Method::GET, HEALTH_PATH, &AuthContext::guest());
        self.send(request, HEALTH_PATH).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{IdentityType, Role};
    use crate::infrastructure::api::test_server::serve_once;

    const USER_JSON: &str = r#"{"id": 3, "identifier": "8001015009087", "identifier_type": "id",
        "first_name": "Thandi", "last_name": "Mokoena", "phone": "0821234567",
        "email": null, "role": "patient", "language": "English"}"#;

    #[tokio::test]
    async fn test_login_builds_session() {
        let body = format!(r#"{{"access_token": "jwt-1", "token_type": "bearer", "user": {USER_JSON}}}"#);
        let (url, request) = serve_once(200, &body).await;
        let client = ApiClient::with_base_url(url).unwrap();

        let session = client
            .login(&Credentials::new("8001015009087", "secret1"))
            .await
            .unwrap();

        assert_eq!(session.token().as_str(), "jwt-1");
        assert_eq!(session.role(), Role::Patient);

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /auth/login"));
        assert!(raw.contains(r#""identifier":"8001015009087""#));
        assert!(!raw.to_ascii_lowercase().contains("authorization"));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let (url, _request) = serve_once(401, r#"{"detail": "Invalid identifier or password"}"#).await;
        let client = ApiClient::with_base_url(url).unwrap();

        let err = client
            .login(&Credentials::new("8001015009087", "wrong1"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid identifier or password");
    }

    #[tokio::test]
    async fn test_register_without_token() {
        let (url, request) =
            serve_once(200, r#"{"message": "User registered successfully", "user_id": 7}"#).await;
        let client = ApiClient::with_base_url(url).unwrap();

        let registration = RegistrationRequest {
            identifier: "A1234567".to_string(),
            identifier_type: IdentityType::Passport,
            first_name: "Sipho".to_string(),
            last_name: "Dlamini".to_string(),
            phone: "0821234567".to_string(),
            password: "secret1".to_string(),
            role: Role::Patient,
            language: "isiZulu".to_string(),
        };
        let receipt = client.register(&registration).await.unwrap();

        assert_eq!(receipt.user_id.as_deref(), Some("7"));
        assert_eq!(receipt.message, "User registered successfully");
        assert!(receipt.session.is_none());

        let raw = request.await.unwrap();
        assert!(raw.contains(r#""identifier_type":"passport""#));
        assert!(raw.contains(r#""role":"patient""#));
    }

    #[tokio::test]
    async fn test_current_user_sends_bearer() {
        let (url, request) = serve_once(200, USER_JSON).await;
        let client = ApiClient::with_base_url(url).unwrap();

        let principal = client
            .current_user(&BearerToken::new_unchecked("jwt-2"))
            .await
            .unwrap();
        assert_eq!(principal.display_name(), "Thandi Mokoena");

        let raw = request.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /auth/me"));
        assert!(raw.contains("authorization: bearer jwt-2"));
    }

    #[tokio::test]
    async fn test_list_users_forbidden() {
        let (url, _request) = serve_once(403, r#"{"detail": "Not enough permissions"}"#).await;
        let client = ApiClient::with_base_url(url).unwrap();

        let err = client
            .list_users(&AuthContext::bearer(BearerToken::new_unchecked("jwt")))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (url, _request) = serve_once(200, r#"{"status": "ok"}"#).await;
        let client = ApiClient::with_base_url(url).unwrap();
        assert!(client.health_check().await.is_ok());
    }
}
