//! Session storage error types.

use thiserror::Error;

/// Session storage error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("failed to access session storage: {0}")]
    AccessFailed(String),

    #[error("failed to read saved session: {0}")]
    RetrievalFailed(String),

    #[error("failed to save session: {0}")]
    StorageFailed(String),

    #[error("failed to delete saved session: {0}")]
    DeletionFailed(String),

    #[error("saved principal snapshot is unreadable: {0}")]
    CorruptSnapshot(String),
}
