//! # rapidclick-server
//!
//! Score Store Service for the RapidClick reaction game.
//!
//! This binary provides:
//! - **`GET /api/highscore`** returning the persisted high score record
//! - **`POST /api/score`** which replaces the record only when the submitted
//!   score is strictly higher
//! - **`GET /health`** for liveness checks
//!
//! The record lives in a single JSON file, created with `{0, null}` on first
//! start.

mod api;
mod config;
mod error;
mod score_store;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::score_store::ScoreStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rapidclick_server=debug")),
        )
        .init();

    info!("Starting RapidClick score server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Initialize the score store
    // -----------------------------------------------------------------------
    let store = Arc::new(ScoreStore::new(config.scores_file.clone()));

    // A broken data directory must not keep the server down; requests will
    // report 500 until it is fixed.
    if let Err(e) = store.initialize().await {
        error!(error = %e, path = %store.path().display(), "Failed to initialize score file");
    }

    let http_addr = config.http_addr;
    let app_state = AppState {
        store,
        config: Arc::new(config),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
