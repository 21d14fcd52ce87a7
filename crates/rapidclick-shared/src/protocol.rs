//! JSON bodies exchanged over the score API.

use serde::{Deserialize, Serialize};

use crate::types::Score;

/// Body of `POST /api/score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub score: Score,
}

/// Reply to `POST /api/score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    pub is_new_high_score: bool,
    pub high_score: Score,
    pub submitted_score: Score,
}

/// Error payload returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Reply to `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
