//! Climate API Server
//!
//! Run with: cargo run --bin climate-api -- --db Resources/hawaii.sqlite
//!
//! # Configuration
//!
//! Settings come from the config file (see `climate-cli config`), then
//! environment variables, then the command-line flags below:
//! - `CLIMATE_DB_PATH`: SQLite file (default: Resources/hawaii.sqlite)
//! - `CLIMATE_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `CLIMATE_API_PORT`: Port to listen on (default: 5000)
//! - `CLIMATE_VALIDATE_DATES`: Reject malformed path dates (default: true)
//! - `RUST_LOG`: Log filter (default: climate=info)

use clap::Parser;
use climate::api::{serve, AppState};
use climate::config::Config;
use climate::logging::init_tracing;
use climate::store::{ClimateStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "climate-api", version, about = "Serve the station climate API")]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite file with the measurement and station tables
    #[arg(long)]
    db: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Let malformed start/end dates through instead of answering 400
    #[arg(long)]
    lenient_dates: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = Config::load_default(args.config.as_deref())?;
    let mut config = loaded.config.clone();
    if let Some(db) = args.db {
        config.store.path = db;
    }
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if args.lenient_dates {
        config.api.validate_dates = false;
    }

    init_tracing(&config.logging);
    loaded.log();

    tracing::info!("Starting Climate API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Store: {:?}", config.store.path);
    tracing::info!("Validate path dates: {}", config.api.validate_dates);

    // Opening verifies the schema; any failure here stops the process.
    let store = SqliteStore::open(&config.store.path)?;
    tracing::info!("Store ready: {}", store.summary()?);

    let state = AppState::new(Arc::new(store), config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Climate API server stopped");
    Ok(())
}
