use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rapidclick_shared::error::SharedError;
use rapidclick_shared::protocol::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid score value")]
    InvalidScore(#[from] SharedError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Failed to read high score: {0}")]
    StoreRead(String),

    #[error("Failed to update score: {0}")]
    StoreWrite(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidScore(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::StoreRead(detail) => {
                tracing::error!(error = %detail, "Score store read failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read high score".to_string(),
                )
            }
            ServerError::StoreWrite(detail) => {
                tracing::error!(error = %detail, "Score store write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to update score".to_string(),
                )
            }
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}
