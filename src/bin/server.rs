//! Storewatch HTTP Server Binary
//!
//! Main entry point for the store monitoring REST API server. It loads the
//! configuration, ingests the source CSVs into the in-memory repository,
//! sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin storewatch-server
//! ```
//!
//! # Environment Variables
//!
//! - `STOREWATCH_CONFIG`: Path to storewatch.toml (default: search cwd)
//! - `HOST` / `PORT`: Override the configured bind address
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use storewatch::config::StorewatchConfig;
use storewatch::db::{self, LocalRepository};
use storewatch::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Storewatch HTTP Server");

    let config = match env::var("STOREWATCH_CONFIG") {
        Ok(path) => StorewatchConfig::from_file(path),
        Err(_) => StorewatchConfig::from_default_location(),
    }
    .map_err(|e| anyhow::anyhow!(e))?;
    let policy = config.report_policy().map_err(|e| anyhow::anyhow!(e))?;

    // Ingest the source tables into the in-memory repository
    let repository = LocalRepository::new();
    let summary = db::load_data_dir(&config.data.dir, &repository).map_err(|e| anyhow::anyhow!(e))?;
    info!(
        observations = summary.observations.loaded,
        business_hours = summary.business_hours.loaded,
        timezones = summary.timezones.loaded,
        skipped = summary.observations.skipped
            + summary.business_hours.skipped
            + summary.timezones.skipped,
        "Ingest complete"
    );

    // Create application state and router
    let state = AppState::new(Arc::new(repository), policy);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
