/// Application name
pub const APP_NAME: &str = "RapidClick";

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default location of the persisted high score record
pub const DEFAULT_SCORES_FILE: &str = "./data/scores.json";

/// Redraw cadence of an active session (~60 Hz)
pub const REDRAW_INTERVAL_MS: u64 = 16;

/// Countdown cadence of an active session
pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

/// Default play surface size in pixels
pub const DEFAULT_SURFACE_WIDTH: f64 = 800.0;
pub const DEFAULT_SURFACE_HEIGHT: f64 = 500.0;

/// Number of entries kept on the device-local leaderboard
pub const MAX_LEADERBOARD_ENTRIES: usize = 5;

/// Storage key (file name) of the device-local leaderboard
pub const LEADERBOARD_STORAGE_KEY: &str = "rapidclick_leaderboard.json";

/// Placeholder shown instead of a numeric high score when the server is unreachable
pub const HIGH_SCORE_ERROR_PLACEHOLDER: &str = "Error";

/// API routes
pub const ROUTE_HIGH_SCORE: &str = "/api/highscore";
pub const ROUTE_SUBMIT_SCORE: &str = "/api/score";
pub const ROUTE_HEALTH: &str = "/health";
