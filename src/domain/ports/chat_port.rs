//! Chat backend port.

use async_trait::async_trait;

use crate::domain::entities::AuthContext;
use crate::domain::errors::ClientError;

/// Port for the assistant's free-text backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Sends a prompt and returns the assistant's reply.
    async fn send_prompt(&self, auth: &AuthContext, prompt: &str) -> Result<String, ClientError>;
}
