use super::app_config::AppConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "session.json";

/// Failure to locate, read or create the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform reports no home directory.
    #[error("no home directory to place configuration in")]
    NoPlatformDirs,
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Defaults could not be encoded as TOML.
    #[error("could not serialize default configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// On-disk locations of the client: config file and session file.
pub struct StorageManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config and data directories.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the platform directories cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        match (AppConfig::default_config_dir(), AppConfig::default_data_dir()) {
            (Some(config_dir), Some(data_dir)) => Ok(Self {
                config_dir,
                data_dir,
            }),
            _ => Err(ConfigError::NoPlatformDirs),
        }
    }

    /// Keeps everything under `root`.
    #[must_use]
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    /// Default config file location.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// File backing the `file` session store.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE_NAME)
    }

    /// Reads the configuration from `path_override` or the default location.
    ///
    /// A missing default file is created with default values. A file that
    /// does not parse is left alone and defaults are used for this run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.config_path(), Path::to_path_buf);

        if !path.exists() {
            info!(path = %path.display(), "Writing default configuration");
            let defaults = AppConfig::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_atomic(&path, toml::to_string_pretty(&defaults)?.as_bytes())?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(&path)?;
        toml::from_str::<AppConfig>(&content).or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring malformed configuration");
            Ok(AppConfig::default())
        })
    }
}

/// Replaces `path` with `content` through a temp file in the same directory.
///
/// # Errors
///
/// Returns an I/O error if the temp file cannot be written or renamed.
pub fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::other("path has no parent directory"))?;
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(content)?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
