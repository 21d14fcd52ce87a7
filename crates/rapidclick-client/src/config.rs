//! Client configuration loaded from environment variables.

use std::path::PathBuf;

use rapidclick_shared::constants::DEFAULT_HTTP_PORT;

use crate::leaderboard::Leaderboard;
use crate::session::PlaySurface;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Score Store Service.
    /// Env: `RAPIDCLICK_SERVER_URL`
    /// Default: `http://localhost:3000`
    pub server_url: String,

    /// Keep a device-local top-5 leaderboard.
    /// Env: `RAPIDCLICK_LEADERBOARD` (true/false)
    /// Default: `true`
    pub leaderboard_enabled: bool,

    /// Where the local leaderboard is stored.
    /// Env: `RAPIDCLICK_LEADERBOARD_PATH`
    /// Default: platform data directory.
    pub leaderboard_path: Option<PathBuf>,

    pub surface: PlaySurface,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            leaderboard_enabled: true,
            leaderboard_path: None,
            surface: PlaySurface::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RAPIDCLICK_SERVER_URL") {
            if !url.is_empty() {
                config.server_url = url;
            }
        }

        if let Some(val) = lookup("RAPIDCLICK_LEADERBOARD") {
            config.leaderboard_enabled = val != "false" && val != "0";
        }

        if let Some(path) = lookup("RAPIDCLICK_LEADERBOARD_PATH") {
            if !path.is_empty() {
                config.leaderboard_path = Some(PathBuf::from(path));
            }
        }

        config
    }

    /// The configured leaderboard, or `None` when the feature is off.
    pub fn leaderboard(&self) -> Option<Leaderboard> {
        if !self.leaderboard_enabled {
            return None;
        }
        let board = match self.leaderboard_path.clone().or_else(Leaderboard::default_path) {
            Some(path) => Leaderboard::load(path),
            None => {
                tracing::warn!("No data directory available, leaderboard kept in memory");
                Leaderboard::in_memory()
            }
        };
        Some(board)
    }
}
