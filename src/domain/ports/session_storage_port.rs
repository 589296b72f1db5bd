//! Session persistence port definition.
//!
//! A saved session lives in two named slots: the bearer credential and a
//! JSON snapshot of the principal. Adapters only move slot strings around;
//! [`session_to_slots`] and [`session_from_slots`] own the format.

use async_trait::async_trait;

use crate::domain::entities::{BearerToken, Principal, Session};
use crate::domain::errors::StorageError;

/// Slot holding the bearer credential.
pub const CREDENTIAL_SLOT: &str = "access_token";

/// Slot holding the principal snapshot.
pub const PRINCIPAL_SLOT: &str = "user";

/// Port for session persistence across restarts.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Loads the saved session.
    ///
    /// Returns [`StorageError::CorruptSnapshot`] when a credential exists but
    /// the principal snapshot cannot be read back.
    async fn load_session(&self) -> Result<Option<Session>, StorageError>;

    /// Saves both slots.
    async fn store_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Deletes both slots. Deleting missing slots is not an error.
    async fn clear_session(&self) -> Result<(), StorageError>;

    /// Checks if a session is saved.
    async fn has_session(&self) -> Result<bool, StorageError> {
        Ok(self.load_session().await?.is_some())
    }
}

/// Serializes a session into `(credential, snapshot)` slot values.
///
/// # Errors
/// Returns error if the principal cannot be serialized.
pub fn session_to_slots(session: &Session) -> Result<(String, String), StorageError> {
    let snapshot = serde_json::to_string(session.principal())
        .map_err(|e| StorageError::StorageFailed(format!("failed to encode principal: {e}")))?;
    Ok((session.token().as_str().to_string(), snapshot))
}

/// Rebuilds a session from raw slot values.
///
/// # Errors
/// Returns [`StorageError::CorruptSnapshot`] when the credential is present
/// but the snapshot is missing or unparseable.
pub fn session_from_slots(
    credential: Option<String>,
    snapshot: Option<String>,
) -> Result<Option<Session>, StorageError> {
    let Some(token) = credential.and_then(BearerToken::new) else {
        return Ok(None);
    };

    let snapshot = snapshot
        .ok_or_else(|| StorageError::CorruptSnapshot("principal snapshot missing".to_string()))?;

    let principal: Principal = serde_json::from_str(&snapshot)
        .map_err(|e| StorageError::CorruptSnapshot(e.to_string()))?;

    Ok(Some(Session::new(principal, token)))
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock session storage for testing, holding raw slot values.
    pub struct MockSessionStorage {
        slots: Arc<RwLock<(Option<String>, Option<String>)>>,
    }

    impl MockSessionStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self {
                slots: Arc::new(RwLock::new((None, None))),
            }
        }

        /// Creates mock storage holding `session`.
        pub fn with_session(session: &Session) -> Self {
            let (credential, snapshot) = session_to_slots(session).unwrap();
            Self::with_slots(Some(credential), Some(snapshot))
        }

        /// Creates mock storage with raw slot values.
        pub fn with_slots(credential: Option<String>, snapshot: Option<String>) -> Self {
            Self {
                slots: Arc::new(RwLock::new((credential, snapshot))),
            }
        }

        /// Returns raw slot values.
        pub async fn slots(&self) -> (Option<String>, Option<String>) {
            self.slots.read().await.clone()
        }
    }

    impl Default for MockSessionStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SessionStoragePort for MockSessionStorage {
        async fn load_session(&self) -> Result<Option<Session>, StorageError> {
            let (credential, snapshot) = self.slots.read().await.clone();
            session_from_slots(credential, snapshot)
        }

        async fn store_session(&self, session: &Session) -> Result<(), StorageError> {
            let (credential, snapshot) = session_to_slots(session)?;
            *self.slots.write().await = (Some(credential), Some(snapshot));
            Ok(())
        }

        async fn clear_session(&self) -> Result<(), StorageError> {
            *self.slots.write().await = (None, None);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    fn session() -> Session {
        Session::new(
            Principal::new("8001015009087", Role::Patient).with_name("Thandi", "Mokoena"),
            BearerToken::new_unchecked("mock_jwt_8001015009087"),
        )
    }

    #[test]
    fn test_slots_round_trip() {
        let (credential, snapshot) = session_to_slots(&session()).unwrap();
        let restored = session_from_slots(Some(credential), Some(snapshot)).unwrap();
        assert_eq!(restored, Some(session()));
    }

    #[test]
    fn test_no_credential_means_no_session() {
        let snapshot = serde_json::to_string(session().principal()).unwrap();
        assert_eq!(session_from_slots(None, Some(snapshot)).unwrap(), None);
    }

    #[test]
    fn test_corrupt_snapshot() {
        let result = session_from_slots(Some("abc".into()), Some("{not json".into()));
        assert!(matches!(result, Err(StorageError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_missing_snapshot_is_corrupt() {
        let result = session_from_slots(Some("abc".into()), None);
        assert!(matches!(result, Err(StorageError::CorruptSnapshot(_))));
    }
}
