//! RiskOps API Server binary.

use std::sync::Arc;

use clap::Parser;
use riskops_api::server::{log_filter, run_server};
use riskops_api::{AppState, ServerConfig};
use riskops_storage::{InMemoryStorage, RedbStorage, StorageAdapter};

/// RiskOps portfolio VaR/CVaR REST API Server
#[derive(Parser, Debug)]
#[command(name = "riskops-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "RISKOPS_CONFIG")]
    config: Option<String>,

    /// Host address to bind to (overrides config)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// redb database file (overrides config)
    #[arg(long, env = "RISKOPS_DB")]
    db: Option<String>,

    /// Use a throwaway in-memory store instead of redb
    #[arg(long, conflicts_with = "db")]
    memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose))
        .init();

    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db) = args.db {
        config.storage_path = db;
    }

    let storage: Arc<dyn StorageAdapter> = if args.memory {
        tracing::info!("Starting with in-memory storage");
        Arc::new(InMemoryStorage::new())
    } else {
        tracing::info!("Opening redb storage at {}", config.storage_path);
        Arc::new(RedbStorage::open(&config.storage_path)?)
    };

    let state = AppState::new(storage).with_model_version(&config.model_version);
    run_server(state, &config.host, config.port).await
}
