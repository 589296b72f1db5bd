//! File-based session storage.
//!
//! Slots are kept as one JSON object, `{"access_token": "...", "user": "..."}`,
//! replaced atomically on every write. Temp files are created owner-only, so
//! the renamed file is too.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::entities::Session;
use crate::domain::errors::StorageError;
use crate::domain::ports::{
    CREDENTIAL_SLOT, PRINCIPAL_SLOT, SessionStoragePort, session_from_slots, session_to_slots,
};
use crate::infrastructure::config::write_atomic;

type Slots = BTreeMap<String, String>;

/// Session storage backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Store backed by `path`. Nothing is read until first use.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_slots(&self) -> Result<Slots, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Slots::new()),
            Err(e) => return Err(StorageError::RetrievalFailed(e.to_string())),
        };
        serde_json::from_str(&content).map_err(|e| {
            warn!(path = ?self.path, error = %e, "Session file is unreadable");
            StorageError::CorruptSnapshot(e.to_string())
        })
    }

    async fn write_slots(&self, slots: Slots) -> Result<(), StorageError> {
        let content = serde_json::to_vec_pretty(&slots)
            .map_err(|e| StorageError::StorageFailed(e.to_string()))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            write_atomic(&path, &content)
        })
        .await
        .map_err(|e| StorageError::StorageFailed(e.to_string()))?
        .map_err(|e| StorageError::StorageFailed(e.to_string()))
    }
}

#[async_trait]
impl SessionStoragePort for FileSessionStorage {
    async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        debug!(path = ?self.path, "Loading session from file");
        let mut slots = self.read_slots().await?;
        session_from_slots(slots.remove(CREDENTIAL_SLOT), slots.remove(PRINCIPAL_SLOT))
    }

    async fn store_session(&self, session: &Session) -> Result<(), StorageError> {
        debug!(path = ?self.path, "Storing session in file");
        let (credential, snapshot) = session_to_slots(session)?;
        let slots = Slots::from([
            (CREDENTIAL_SLOT.to_string(), credential),
            (PRINCIPAL_SLOT.to_string(), snapshot),
        ]);
        self.write_slots(slots).await
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        debug!(path = ?self.path, "Clearing session file");
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeletionFailed(e.to_string())),
        }
    }
}
