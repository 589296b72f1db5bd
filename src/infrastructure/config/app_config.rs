//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;

const APP_NAME: &str = "vitalai";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "vitalai";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where the session is persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    /// System keyring.
    #[default]
    Keyring,
    /// JSON file under the data directory.
    File,
    /// Kept in memory only.
    Memory,
}

/// Application configuration, merged from the config file and the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Credential supplied on the command line or environment.
    #[serde(skip)]
    pub token: Option<String>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log request and response bodies.
    #[serde(default)]
    pub debug: bool,

    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// UI settings.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Deadline for ordinary calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Deadline for chat calls, in seconds.
    #[serde(default = "default_chat_timeout_secs")]
    pub chat_timeout_secs: u64,
}

impl ApiConfig {
    /// Deadline for every call except chat.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Deadline for `/chat`.
    #[must_use]
    pub const fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            chat_timeout_secs: default_chat_timeout_secs(),
        }
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Remember the session between runs.
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Storage backend.
    #[serde(default)]
    pub store: SessionStoreKind,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: true,
            store: SessionStoreKind::default(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Timestamp format string (chrono format).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Accent color name or hex value.
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

impl UiConfig {
    /// Configured timestamp format, or the default when it does not parse.
    #[must_use]
    pub fn effective_timestamp_format(&self) -> String {
        let invalid = chrono::format::StrftimeItems::new(&self.timestamp_format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if invalid {
            tracing::warn!(format = %self.timestamp_format, "Invalid timestamp format, using default");
            default_timestamp_format()
        } else {
            self.timestamp_format.clone()
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            accent_color: default_accent_color(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_chat_timeout_secs() -> u64 {
    60
}

fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}

fn default_accent_color() -> String {
    "cyan".to_string()
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_url) = args.api_url {
            self.api.url = api_url;
        }
        if let Some(store) = args.session_store {
            self.session.store = store;
        }
        if args.no_persist {
            self.session.persist = false;
        }
        if args.debug {
            self.debug = true;
        }
        self.token = args.token.filter(|t| !t.trim().is_empty());
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default data directory.
    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        Self::default_data_dir().map(|dir| dir.join("vitalai.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            token: None,
            log_level: LogLevel::Info,
            debug: false,
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [api]
            url = "https://api.vitalai.example"

            [session]
            store = "file"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.api.url, "https://api.vitalai.example");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.session.store, SessionStoreKind::File);
        assert!(config.session.persist);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api.url, "http://localhost:8000");
        assert_eq!(config.api.chat_timeout(), Duration::from_secs(60));
        assert_eq!(config.session.store, SessionStoreKind::Keyring);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_invalid_timestamp_format_falls_back() {
        let ui = UiConfig {
            timestamp_format: "%Q".to_string(),
            ..UiConfig::default()
        };
        assert_eq!(ui.effective_timestamp_format(), "%H:%M");

        let ui = UiConfig {
            timestamp_format: "%d %b %H:%M".to_string(),
            ..UiConfig::default()
        };
        assert_eq!(ui.effective_timestamp_format(), "%d %b %H:%M");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config: AppConfig = toml::from_str("[api]\nurl = \"http://file\"").unwrap();
        let args = CliArgs::parse_from([
            "vitalai",
            "--api-url",
            "http://cli",
            "--no-persist",
            "--session-store",
            "memory",
            "--token",
            "abc",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.api.url, "http://cli");
        assert!(!config.session.persist);
        assert_eq!(config.session.store, SessionStoreKind::Memory);
        assert_eq!(config.token.as_deref(), Some("abc"));
    }
}
