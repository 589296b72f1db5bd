//! Infrastructure layer with external service adapters.

/// VitalAI backend client.
pub mod api;
/// Application configuration.
pub mod config;
/// Session storage adapters.
pub mod storage;

pub use api::ApiClient;
pub use config::{AppConfig, CliArgs, LogLevel, SessionStoreKind, StorageManager};
pub use storage::{FileSessionStorage, KeyringSessionStorage, MemorySessionStorage};
