//! Session restoration use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::SessionSource;
use crate::domain::entities::{BearerToken, Session};
use crate::domain::errors::{ClientError, StorageError};
use crate::domain::ports::{AuthPort, SessionStoragePort};

/// Session recovered at startup together with its source.
#[derive(Debug, Clone)]
pub struct RestoredSession {
    /// The session.
    pub session: Session,
    /// Where it came from.
    pub source: SessionSource,
}

impl RestoredSession {
    /// Creates new restored session.
    #[must_use]
    pub const fn new(session: Session, source: SessionSource) -> Self {
        Self { session, source }
    }
}

/// Resolves the startup session from available sources.
pub struct RestoreSessionUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
}

impl RestoreSessionUseCase {
    /// Creates new use case.
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

    /// Resolves the session.
    ///
    /// Priority:
    /// 1. Session store
    /// 2. CLI/Env credential, resolved through `/auth/me`
    ///
    /// A stored credential whose principal snapshot is unreadable clears the
    /// store and is skipped.
    ///
    /// # Errors
    /// Returns error if the CLI credential cannot be checked because the
    /// backend is unreachable or failing.
    pub async fn execute(
        &self,
        cli_token: Option<String>,
    ) -> Result<Option<RestoredSession>, ClientError> {
        debug!("Checking session store");
        match self.storage_port.load_session().await {
            Ok(Some(session)) => {
                info!(role = %session.role(), "Using stored session");
                return Ok(Some(RestoredSession::new(session, SessionSource::Stored)));
            }
            Ok(None) => debug!("No stored session"),
            Err(StorageError::CorruptSnapshot(reason)) => {
                warn!(%reason, "Stored session is corrupt, clearing it");
                if let Err(e) = self.storage_port.clear_session().await {
                    warn!(error = %e, "Failed to clear corrupt session");
                }
            }
            Err(e) => debug!(error = %e, "Failed to read session store"),
        }

        let Some(token) = cli_token.and_then(BearerToken::new) else {
            debug!("No session found in any source");
            return Ok(None);
        };

        debug!(token = %token, "Resolving command-line credential");
        match self.auth_port.current_user(&token).await {
            Ok(principal) => {
                info!(role = %principal.role(), "Using credential from command line / environment");
                Ok(Some(RestoredSession::new(
                    Session::new(principal, token),
                    SessionSource::CommandLine,
                )))
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Command-line credential was rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Principal, Role};
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStorage};

    fn stored_session() -> Session {
        Session::new(
            Principal::new("8001015009087", Role::Staff),
            BearerToken::new_unchecked("stored-token"),
        )
    }

    #[tokio::test]
    async fn test_prefers_stored_session() {
        let auth = Arc::new(MockAuthPort::new(true, Role::Patient));
        let storage = Arc::new(MockSessionStorage::with_session(&stored_session()));

        let restored = RestoreSessionUseCase::new(auth, storage)
            .execute(Some("cli-token".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(restored.source, SessionSource::Stored);
        assert_eq!(restored.session.role(), Role::Staff);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_clears_both_slots() {
        let auth = Arc::new(MockAuthPort::new(true, Role::Patient));
        let storage = Arc::new(MockSessionStorage::with_slots(
            Some("stored-token".to_string()),
            Some("{broken".to_string()),
        ));

        let restored = RestoreSessionUseCase::new(auth, storage.clone())
            .execute(None)
            .await
            .unwrap();

        assert!(restored.is_none());
        assert_eq!(storage.slots().await, (None, None));
    }

    #[tokio::test]
    async fn test_falls_back_to_cli_token() {
        let auth = Arc::new(MockAuthPort::new(true, Role::Admin));
        let storage = Arc::new(MockSessionStorage::new());

        let restored = RestoreSessionUseCase::new(auth, storage)
            .execute(Some("cli-token".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(restored.source, SessionSource::CommandLine);
        assert_eq!(restored.session.role(), Role::Admin);
        assert_eq!(restored.session.token().as_str(), "cli-token");
    }

    #[tokio::test]
    async fn test_rejected_cli_token() {
        let auth = Arc::new(MockAuthPort::new(false, Role::Admin));
        let storage = Arc::new(MockSessionStorage::new());

        let restored = RestoreSessionUseCase::new(auth, storage)
            .execute(Some("cli-token".to_string()))
            .await
            .unwrap();

        assert!(restored.is_none());
    }

    #[tokio::test]
    async fn test_blank_cli_token_ignored() {
        let auth = Arc::new(MockAuthPort::new(true, Role::Admin));
        let storage = Arc::new(MockSessionStorage::new());

        let restored = RestoreSessionUseCase::new(auth, storage)
            .execute(Some("   ".to_string()))
            .await
            .unwrap();

        assert!(restored.is_none());
    }
}
