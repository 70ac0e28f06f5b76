//! Community Platform server
//!
//! Run with: cargo run --bin community-platform [config.toml]
//!
//! # Configuration
//!
//! Without a path argument the config is searched in the default locations
//! (see [`Config::load_default`]). Environment variables override the file:
//! - `COMMUNITY_HOST`: Host to bind to (default: 0.0.0.0)
//! - `COMMUNITY_PORT`: Port to listen on (default: 8080)
//! - `COMMUNITY_SESSION_BACKEND`: `memory` or `file` (default: memory)
//! - `COMMUNITY_DATA_DIR`: Data directory for file-backed sessions
//! - `COMMUNITY_LOG_LEVEL`: Log level (default: info)
//! - `COMMUNITY_LOG_FORMAT`: `pretty` or `json` (default: pretty)
//! - `RUST_LOG`: Full filter directive, takes precedence over the log level

use community_platform::api::{serve, ApiConfig, AppState};
use community_platform::config::{Config, LoggingConfig};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_with_env(&path)?,
        None => Config::load_default(),
    };

    init_tracing(&config.logging)?;

    tracing::info!("Starting Community Platform v{}", env!("CARGO_PKG_VERSION"));

    let api_config = ApiConfig::from_config(&config);
    let state = AppState::new(api_config.clone());
    tracing::info!("Session backend: {}", state.sessions.backend().name());

    serve(state, &api_config).await?;

    tracing::info!("Community Platform stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "community_platform={},tower_http=debug",
            logging.level
        ))
    });

    let writer = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let (json, pretty) = if logging.is_json() {
        (Some(tracing_subscriber::fmt::layer().json().with_writer(writer)), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().with_writer(writer)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();

    Ok(())
}
