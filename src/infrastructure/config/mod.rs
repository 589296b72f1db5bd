//! Application configuration.

/// Config file sections and defaults.
pub mod app_config;
/// Command-line arguments.
pub mod args;
/// Config and session file locations.
pub mod storage;

pub use app_config::{AppConfig, ApiConfig, LogLevel, SessionConfig, SessionStoreKind, UiConfig};
pub use args::CliArgs;
pub use storage::{ConfigError, StorageManager, write_atomic};
