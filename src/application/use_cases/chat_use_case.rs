//! Assistant chat use case.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::BaseDirs;
use tracing::{debug, warn};

use crate::application::services::CHAT_ERROR_REPLY;
use crate::domain::entities::AuthContext;
use crate::domain::errors::ClientError;
use crate::domain::ports::ChatPort;

/// Outcome of forwarding a prompt.
///
/// A reply is always produced; `error` carries the failure behind a
/// fallback reply so the caller can react to an expired session.
#[derive(Debug)]
pub struct ChatReply {
    /// Text to append as the assistant's message.
    pub text: String,
    /// Failure behind a fallback reply.
    pub error: Option<ClientError>,
}

/// Forwards prompts to the assistant backend and checks attachments.
#[derive(Clone)]
pub struct ChatUseCase {
    chat_port: Arc<dyn ChatPort>,
}

impl ChatUseCase {
    /// Use case over `chat_port`.
    #[must_use]
    pub const fn new(chat_port: Arc<dyn ChatPort>) -> Self {
        Self { chat_port }
    }

    /// Sends `prompt`, degrading any failure to the fixed error reply.
    pub async fn send(&self, auth: &AuthContext, prompt: &str) -> ChatReply {
        debug!(chars = prompt.chars().count(), guest = auth.is_guest(), "Sending chat prompt");
        match self.chat_port.send_prompt(auth, prompt).await {
            Ok(text) => ChatReply { text, error: None },
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                ChatReply {
                    text: CHAT_ERROR_REPLY.to_string(),
                    error: Some(e),
                }
            }
        }
    }

    /// Resolves an attachment path to the file name shown in the transcript.
    ///
    /// A leading `~` stands for the user's home directory.
    ///
    /// # Errors
    /// Returns error if the path does not name a readable file.
    pub async fn attachment_name(&self, path: &str) -> Result<String, ClientError> {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let path = expand_home(path, home.as_deref());
        let path = path.as_path();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            ClientError::unexpected(format!("Cannot attach {}: {e}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(ClientError::unexpected(format!(
                "Cannot attach {}: not a file",
                path.display()
            )));
        }
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ClientError::unexpected("Attachment has no file name"))
    }
}

/// Replaces a leading `~` or `~/` with `home`. Other paths pass through.
fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    let path = path.trim();
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}
