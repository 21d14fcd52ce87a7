//! # rapidclick-client
//!
//! Game Session Controller for RapidClick: the session state machine, the
//! tokio game loop that drives its redraw and countdown cadences, the HTTP
//! client for the Score Store Service and the device-local leaderboard.

pub mod api_client;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod runtime;
pub mod session;
pub mod view;

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use crate::api_client::HttpScoreClient;
use crate::config::ClientConfig;
use crate::controller::GameController;
use crate::runtime::{spawn_game, GameHandle};
use crate::view::{Feedback, GameView};

/// Install the global tracing subscriber (respects `RUST_LOG`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rapidclick_client=debug,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Wire a view and feedback sink to the configured server and start the game
/// loop. Must be called from within a tokio runtime.
pub fn launch<V, F>(config: &ClientConfig, view: V, feedback: F) -> GameHandle
where
    V: GameView + Send + 'static,
    F: Feedback + Send + 'static,
{
    tracing::info!(server = %config.server_url, "Starting RapidClick client");

    let controller = GameController::new(view, feedback, config.surface, config.leaderboard());
    let service = Arc::new(HttpScoreClient::new(config.server_url.clone()));
    spawn_game(controller, service)
}
