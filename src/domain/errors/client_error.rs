//! Errors surfaced by backend-facing operations.

use thiserror::Error;

use super::{StorageError, ValidationErrors};

/// Shown whenever the backend could not be reached at all.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the VitalAI service. Check your connection and try again.";

/// Shown when the backend rejected our credential.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Client operation error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("network error: {message}")]
    Network { message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl ClientError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates server-reported error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the credential was rejected and the session must end.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns field errors when this is a validation failure.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Server-reported messages are passed through verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors
                .first()
                .map_or_else(|| "Please check the form".to_string(), |e| e.message.clone()),
            Self::Network { .. } => CONNECTIVITY_MESSAGE.to_string(),
            Self::Unauthorized { message } if !message.trim().is_empty() => message.clone(),
            Self::Unauthorized { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::Decode { .. } | Self::Unexpected { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Storage(e) => format!("Could not access saved session: {e}"),
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
