//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use rapidclick_shared::constants::{DEFAULT_HTTP_PORT, DEFAULT_SCORES_FILE};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`, or `PORT` to change only the port.
    /// Default: `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// JSON file holding the single high score record.
    /// Env: `SCORES_FILE`
    /// Default: `./data/scores.json`
    pub scores_file: PathBuf,

    /// Whether browsers from any origin may call the API.
    /// Env: `CORS_ALLOW_ANY` (true/false)
    /// Default: `true`
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            scores_file: PathBuf::from(DEFAULT_SCORES_FILE),
            cors_allow_any: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(p) => config.http_addr.set_port(p),
                Err(_) => tracing::warn!(value = %port, "Invalid PORT, ignoring"),
            }
        }

        if let Some(path) = lookup("SCORES_FILE") {
            if !path.is_empty() {
                config.scores_file = PathBuf::from(path);
            }
        }

        if let Some(val) = lookup("CORS_ALLOW_ANY") {
            config.cors_allow_any = val != "false" && val != "0";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 3000).into());
        assert_eq!(config.scores_file, PathBuf::from("./data/scores.json"));
        assert!(config.cors_allow_any);
    }

    #[test]
    fn test_port_overrides_addr_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("PORT", "4000"),
        ]));
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 4000).into());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("PORT", "99999"),
            ("CORS_ALLOW_ANY", "0"),
        ]));
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 3000).into());
        assert!(!config.cors_allow_any);
    }

    #[test]
    fn test_scores_file_override() {
        let config = ServerConfig::from_lookup(lookup_from(&[("SCORES_FILE", "/tmp/s.json")]));
        assert_eq!(config.scores_file, PathBuf::from("/tmp/s.json"));
    }
}
