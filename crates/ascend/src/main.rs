//! Ascend platform API server.
//!
//! Serves drip-scheduled content access, trial status, and session booking
//! for the Ascend coaching platform.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::access::ContentCatalog;
use crate::config::AppConfig;
use crate::db::MemberDb;
use crate::identity::IdentityClient;
use crate::types::AppState;

mod access;
mod booking;
mod config;
mod db;
mod identity;
mod server;
mod trial;
mod types;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let config = AppConfig::load(&config_path)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Failed to load configuration from {config_path}"))?;

    let db = MemberDb::open(&config.db_path)
        .with_context(|| format!("Failed to open member database at {}", config.db_path))?;

    let catalog = ContentCatalog::load_from_file(&config.catalog_path)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Failed to load content catalog from {}", config.catalog_path))?;
    info!(items = catalog.len(), "Loaded content catalog");

    let identity = IdentityClient::new(config.identity.clone())?;

    let bind_addr = format!("{}:{}", config.address, config.port);
    let state = Arc::new(AppState {
        db,
        catalog,
        identity,
    });

    let router = server::create_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    info!("Listening on http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when ctrl-c is received, triggering graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
