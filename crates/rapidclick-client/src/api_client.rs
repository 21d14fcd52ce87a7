//! HTTP client for the Score Store Service.

use std::future::Future;

use reqwest::Response;
use tracing::debug;

use rapidclick_shared::constants::{ROUTE_HIGH_SCORE, ROUTE_SUBMIT_SCORE};
use rapidclick_shared::protocol::{ErrorResponse, SubmitScoreRequest, SubmitScoreResponse};
use rapidclick_shared::types::{Score, ScoreRecord};

use crate::error::ClientError;

/// Remote high score operations the game loop depends on.
pub trait ScoreService: Send + Sync + 'static {
    fn fetch_high_score(&self) -> impl Future<Output = Result<ScoreRecord, ClientError>> + Send;

    fn submit_score(
        &self,
        score: u32,
    ) -> impl Future<Output = Result<SubmitScoreResponse, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpScoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpScoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

impl ScoreService for HttpScoreClient {
    async fn fetch_high_score(&self) -> Result<ScoreRecord, ClientError> {
        let resp = self.http.get(self.url(ROUTE_HIGH_SCORE)).send().await?;
        let record: ScoreRecord = check_status(resp).await?.json().await?;
        debug!(score = %record.score, "Fetched high score");
        Ok(record)
    }

    async fn submit_score(&self, score: u32) -> Result<SubmitScoreResponse, ClientError> {
        let body = SubmitScoreRequest {
            score: Score::from(score),
        };
        let resp = self
            .http
            .post(self.url(ROUTE_SUBMIT_SCORE))
            .json(&body)
            .send()
            .await?;
        let reply: SubmitScoreResponse = check_status(resp).await?.json().await?;
        debug!(
            score,
            high_score = %reply.high_score,
            new_record = reply.is_new_high_score,
            "Submitted score"
        );
        Ok(reply)
    }
}

/// Map a non-2xx reply to [`ClientError::Server`], keeping the `{error}`
/// message when the body carries one.
async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}
