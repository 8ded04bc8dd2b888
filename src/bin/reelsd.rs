//! reelsd: reelsearch route server.
//!
//! Serves `/api/v1/movies/search` and `/api/v1/movies/semantic` on top of
//! the configured search backend.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use reelsearch::config::Config;
use reelsearch::server::{self, AppState};

/// reelsearch route server.
#[derive(Parser)]
#[command(name = "reelsd")]
#[command(version)]
#[command(about = "Movie search route server")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Override the bind address from the config file.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let backend = config.http_backend()?;

    let address = args.address.unwrap_or(config.server.address);
    let listener = TcpListener::bind(&address).await.map_err(|e| {
        reelsearch::ReelError::Configuration(format!("Failed to bind {address}: {e}"))
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %listener.local_addr()?,
        backend = backend.base_url(),
        "reelsd starting"
    );

    server::serve(listener, AppState::new(Arc::new(backend))).await?;
    Ok(())
}
