//! Wildstack Game Server
//!
//! Authoritative table server for the escalating-draw card game.
//! Clients connect over WebSocket, take a seat, and submit plays; the
//! server holds the only real copy of the table.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wildstack::network::{ServerConfig, TableServer};
use wildstack::{MAX_SEATS, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = ServerConfig::default();
    if let Ok(addr) = std::env::var("WILDSTACK_BIND") {
        config.bind_addr = addr
            .parse()
            .with_context(|| format!("Invalid bind address: {addr}"))?;
    }

    info!("Wildstack Server v{}", VERSION);
    info!("Max seats: {}", MAX_SEATS);
    info!("Binding to {}", config.bind_addr);

    let server = TableServer::new(config);
    server.run().await.context("Server exited with error")?;

    Ok(())
}
