//! In-memory session storage for runs that persist nothing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::Session;
use crate::domain::errors::StorageError;
use crate::domain::ports::SessionStoragePort;

/// Keeps the session for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStorage {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStoragePort for MemorySessionStorage {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        Ok(self.session.read().await.clone())
    }

    async fn store_session(&self, session: &Session) -> Result<(), StorageError> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        *self.session.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BearerToken, Principal, Role};

    #[tokio::test]
    async fn test_round_trip() {
        let storage = MemorySessionStorage::new();
        let session = Session::new(
            Principal::new("8001015009087", Role::Patient),
            BearerToken::new_unchecked("memory-token"),
        );

        storage.store_session(&session).await.unwrap();
        assert!(storage.has_session().await.unwrap());

        storage.clear_session().await.unwrap();
        assert_eq!(storage.load_session().await.unwrap(), None);
    }
}
