use serde::Serialize;

use rapidclick_shared::protocol::SubmitScoreResponse;
use rapidclick_shared::types::{Difficulty, ScoreRecord};

use crate::session::{SessionState, Target};

/// Notifications sent *from* the game loop to the embedding application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GameNotification {
    SessionStarted { difficulty: Difficulty },
    SessionEnded { score: u32 },
    HighScoreLoaded(ScoreRecord),
    ScoreSubmitted(SubmitScoreResponse),
    /// The Score Store Service could not be reached or refused the request.
    ServiceError { operation: String, error: String },
}

/// Point-in-time view of the session, answered by the game loop on request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub difficulty: Difficulty,
    pub score: u32,
    pub time_remaining: i64,
    pub target: Target,
}
