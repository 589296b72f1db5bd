use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vitalai::application::use_cases::{RestoreSessionUseCase, RestoredSession};
use vitalai::domain::ports::SessionStoragePort;
use vitalai::infrastructure::{
    ApiClient, AppConfig, CliArgs, FileSessionStorage, KeyringSessionStorage,
    MemorySessionStorage, SessionStoreKind, StorageManager,
};
use vitalai::presentation::{App, AppPorts};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(storage: &StorageManager) -> Result<AppConfig> {
    let args = CliArgs::parse();
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn session_store(config: &AppConfig, storage: &StorageManager) -> Arc<dyn SessionStoragePort> {
    if !config.session.persist {
        return Arc::new(MemorySessionStorage::new());
    }
    match config.session.store {
        SessionStoreKind::Keyring => Arc::new(KeyringSessionStorage::new()),
        SessionStoreKind::File => Arc::new(FileSessionStorage::new(storage.session_path())),
        SessionStoreKind::Memory => Arc::new(MemorySessionStorage::new()),
    }
}

async fn create_app() -> Result<(App, Option<RestoredSession>)> {
    let storage = StorageManager::new()?;
    let config = load_config(&storage)?;

    init_logging(&config)?;

    info!(version = vitalai::VERSION, api = %config.api.url, "Starting VitalAI");

    let client = Arc::new(ApiClient::new(&config.api, config.debug)?);
    let sessions = session_store(&config, &storage);

    let restored = match RestoreSessionUseCase::new(client.clone(), sessions.clone())
        .execute(config.token.clone())
        .await
    {
        Ok(restored) => restored,
        Err(e) => {
            warn!(error = %e, "Could not restore session, starting signed out");
            None
        }
    };

    let ports = AppPorts {
        auth: client.clone(),
        chat: client.clone(),
        appointments: client,
        storage: sessions,
    };
    let app = App::new(ports, &config.ui, config.session.persist);

    Ok((app, restored))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Ignoring unreadable .env file: {e}");
    }

    let (app, restored) = create_app().await?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal, restored).await;

    ratatui::restore();

    result
}
