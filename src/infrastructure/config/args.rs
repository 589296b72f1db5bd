use super::app_config::{LogLevel, SessionStoreKind};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "vitalai",
    version,
    about = "Terminal client for the VitalAI healthcare assistant",
    long_about = None
)]
/// Command-line options. Each one overrides the config file.
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL.
    #[arg(long, value_name = "URL", env = "VITALAI_API_URL")]
    pub api_url: Option<String>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Bearer credential to start with when no session is stored.
    #[arg(long, env = "VITALAI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where to keep the session between runs.
    #[arg(long, value_enum)]
    pub session_store: Option<SessionStoreKind>,

    /// Do not persist the session.
    #[arg(long)]
    pub no_persist: bool,

    /// Log request and response bodies.
    #[arg(long)]
    pub debug: bool,
}
