//! VitalAI backend HTTP client.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::ErrorResponse;
use crate::domain::entities::AuthContext;
use crate::domain::errors::ClientError;
use crate::infrastructure::config::ApiConfig;

const USER_AGENT: &str = concat!("vitalai/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for every backend port.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    chat_timeout: Duration,
    log_bodies: bool,
}

impl ApiClient {
    /// Creates client from configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &ApiConfig, log_bodies: bool) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            chat_timeout: config.chat_timeout(),
            log_bodies,
        })
    }

    /// Creates client with default timeouts against `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let config = ApiConfig {
            url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, false)
    }

    /// Backend root without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) const fn chat_timeout(&self) -> Duration {
        self.chat_timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Starts a request, attaching the bearer credential when there is one.
    pub(crate) fn request(&self, method: Method, path: &str, auth: &AuthContext) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match auth.token() {
            Some(token) => builder.header(header::AUTHORIZATION, token.header_value()),
            None => builder,
        }
    }

    /// Starts a request carrying a JSON body.
    pub(crate) fn request_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        auth: &AuthContext,
        body: &B,
    ) -> RequestBuilder {
        if self.log_bodies {
            match serde_json::to_string(body) {
                Ok(json) => debug!(path, body = %redact_password(&json), "Request body"),
                Err(e) => debug!(path, error = %e, "Request body not serializable"),
            }
        }
        self.request(method, path, auth).json(body)
    }

    /// Sends a request and maps failures onto [`ClientError`].
    pub(crate) async fn send(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<Response, ClientError> {
        debug!(path, "API request");
        let response = builder.send().await.map_err(|e| {
            warn!(path, error = %e, "Failed to reach backend");
            map_transport_error(&e)
        })?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if self.log_bodies {
            debug!(path, %body, "Error response body");
        }
        let error = error_from_status(status, &body);
        warn!(path, status = status.as_u16(), error = %error, "Backend returned error");
        Err(error)
    }

    /// Sends a request and decodes a JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(builder, path).await?;
        let body = response.text().await.map_err(|e| map_transport_error(&e))?;
        if self.log_bodies {
            debug!(path, body = %redact_token(&body), "Response body");
        }
        serde_json::from_str(&body).map_err(|e| {
            warn!(path, error = %e, "Failed to parse response");
            ClientError::decode(format!("failed to parse response from {path}: {e}"))
        })
    }
}

/// Maps a failed send onto the network variant.
fn map_transport_error(e: &reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::network("request timed out")
    } else if e.is_connect() {
        ClientError::network("failed to connect to the VitalAI service")
    } else {
        ClientError::network(e.to_string())
    }
}

/// Builds the error for a non-success response.
///
/// The FastAPI `detail` is surfaced verbatim when present.
pub(crate) fn error_from_status(status: StatusCode, body: &str) -> ClientError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.detail)
        .filter(|d| !d.trim().is_empty());

    match (status, detail) {
        (StatusCode::UNAUTHORIZED, detail) => ClientError::unauthorized(detail.unwrap_or_default()),
        (
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT,
            None,
        ) => ClientError::network("the VitalAI service is temporarily unavailable"),
        (status, Some(detail)) => ClientError::server(status.as_u16(), detail),
        (status, None) => ClientError::server(status.as_u16(), format!("HTTP {status}")),
    }
}

fn redact_password(json: &str) -> String {
    redact_field(json, "password")
}

fn redact_token(json: &str) -> String {
    redact_field(json, "access_token")
}

fn redact_field(json: &str, field: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(mut value) => {
            if let Some(slot) = value.get_mut(field) {
                *slot = serde_json::Value::String("<redacted>".to_string());
            }
            value.to_string()
        }
        Err(_) => json.to_string(),
    }
}
