//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::Session;
use crate::domain::errors::StorageError;
use crate::domain::ports::{
    CREDENTIAL_SLOT, PRINCIPAL_SLOT, SessionStoragePort, session_from_slots, session_to_slots,
};

const KEYRING_SERVICE: &str = "vitalai";

/// System keyring session storage adapter. Each slot is one keyring entry.
pub struct KeyringSessionStorage {
    service: String,
}

impl KeyringSessionStorage {
    /// Creates new storage with the default service name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Creates storage under a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, slot: &str) -> Result<Entry, StorageError> {
        Entry::new(&self.service, slot)
            .map_err(|e| StorageError::AccessFailed(format!("failed to access keyring: {e}")))
    }

    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        match self.entry(slot)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(slot, error = %e, "Failed to read keyring slot");
                Err(StorageError::RetrievalFailed(e.to_string()))
            }
        }
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.entry(slot)?.set_password(value).map_err(|e| {
            warn!(slot, error = %e, "Failed to write keyring slot");
            StorageError::StorageFailed(e.to_string())
        })
    }

    fn delete(&self, slot: &str) -> Result<(), StorageError> {
        match self.entry(slot)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(slot, error = %e, "Failed to delete keyring slot");
                Err(StorageError::DeletionFailed(e.to_string()))
            }
        }
    }
}

impl Default for KeyringSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        debug!(service = %self.service, "Loading session from keyring");
        let credential = self.read(CREDENTIAL_SLOT)?;
        let snapshot = self.read(PRINCIPAL_SLOT)?;
        session_from_slots(credential, snapshot)
    }

    async fn store_session(&self, session: &Session) -> Result<(), StorageError> {
        debug!(service = %self.service, "Storing session in keyring");
        let (credential, snapshot) = session_to_slots(session)?;
        self.write(PRINCIPAL_SLOT, &snapshot)?;
        self.write(CREDENTIAL_SLOT, &credential)?;
        debug!("Session stored successfully");
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        debug!(service = %self.service, "Clearing session from keyring");
        self.delete(CREDENTIAL_SLOT)?;
        self.delete(PRINCIPAL_SLOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BearerToken, Principal, Role};

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_session() {
        let storage = KeyringSessionStorage::with_service("vitalai-test");
        let session = Session::new(
            Principal::new("8001015009087", Role::Patient),
            BearerToken::new_unchecked("keyring-test-token"),
        );

        storage.store_session(&session).await.unwrap();

        let retrieved = storage.load_session().await.unwrap();
        assert_eq!(retrieved, Some(session));

        storage.clear_session().await.unwrap();
        assert!(!storage.has_session().await.unwrap());
    }
}
