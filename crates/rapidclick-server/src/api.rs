use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use rapidclick_shared::constants::{ROUTE_HEALTH, ROUTE_HIGH_SCORE, ROUTE_SUBMIT_SCORE};
use rapidclick_shared::protocol::{HealthResponse, SubmitScoreResponse};
use rapidclick_shared::types::{Score, ScoreRecord};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::score_store::ScoreStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScoreStore>,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route(ROUTE_HEALTH, get(health_check))
        .route(ROUTE_HIGH_SCORE, get(get_high_score))
        .route(ROUTE_SUBMIT_SCORE, post(submit_score));

    if state.config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_high_score(State(state): State<AppState>) -> Result<Json<ScoreRecord>, ServerError> {
    let record = state.store.read().await?;
    debug!(score = %record.score, "High score requested");
    Ok(Json(record))
}

async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ServerError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "Rejected malformed score submission");
        ServerError::BadRequest(e.body_text())
    })?;

    let raw = body.get("score").unwrap_or(&serde_json::Value::Null);
    let score = Score::from_json(raw).map_err(|e| {
        warn!(error = %e, "Rejected invalid score");
        ServerError::from(e)
    })?;

    let resp = state.store.submit(score).await?;
    info!(
        submitted = %resp.submitted_score,
        high_score = %resp.high_score,
        new_record = resp.is_new_high_score,
        "Score submitted"
    );
    Ok(Json(resp))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.json"));
        store.initialize().await.unwrap();
        let state = AppState {
            store: Arc::new(store),
            config: Arc::new(ServerConfig::default()),
        };
        (state, dir)
    }

    async fn seeded_state(score: u32) -> (AppState, TempDir) {
        let (state, dir) = test_state().await;
        let record = ScoreRecord::new(Score::from(score), Utc::now());
        std::fs::write(
            state.store.path(),
            serde_json::to_string_pretty(&record).unwrap(),
        )
        .unwrap();
        (state, dir)
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_score(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/score")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_high() -> Request<Body> {
        Request::builder()
            .uri("/api/highscore")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_default_high_score() {
        let (state, _dir) = test_state().await;
        let (status, body) = send(&state, get_high()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "score": 0, "date": null }));
    }

    #[tokio::test]
    async fn test_get_unreadable_store_is_500() {
        let (state, _dir) = test_state().await;
        std::fs::write(state.store.path(), "{{{").unwrap();

        let (status, body) = send(&state, get_high()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to read high score" }));
    }

    #[tokio::test]
    async fn test_submit_new_high_score() {
        let (state, _dir) = seeded_state(5).await;
        let (status, body) = send(&state, post_score(r#"{ "score": 10 }"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "isNewHighScore": true, "highScore": 10, "submittedScore": 10 })
        );

        let (_, stored) = send(&state, get_high()).await;
        assert_eq!(stored["score"], json!(10));
        assert!(stored["date"].is_string());
    }

    #[tokio::test]
    async fn test_submit_lower_score() {
        let (state, _dir) = seeded_state(5).await;
        let before = std::fs::read_to_string(state.store.path()).unwrap();

        let (status, body) = send(&state, post_score(r#"{ "score": 3 }"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "isNewHighScore": false, "highScore": 5, "submittedScore": 3 })
        );
        assert_eq!(std::fs::read_to_string(state.store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_submit_invalid_scores_are_400() {
        let (state, _dir) = seeded_state(5).await;
        let before = std::fs::read_to_string(state.store.path()).unwrap();

        for body in [
            r#"{ "score": -1 }"#,
            r#"{ "score": "x" }"#,
            r#"{ "score": null }"#,
            r#"{}"#,
            r#"not json"#,
        ] {
            let (status, resp) = send(&state, post_score(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert!(resp["error"].is_string(), "body: {body}");
        }

        assert_eq!(std::fs::read_to_string(state.store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_submit_write_failure_is_500() {
        let (state, _dir) = seeded_state(5).await;
        std::fs::create_dir(state.store.path().with_file_name("scores.json.tmp")).unwrap();

        let (status, body) = send(&state, post_score(r#"{ "score": 50 }"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to update score" }));
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _dir) = test_state().await;
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }
}
