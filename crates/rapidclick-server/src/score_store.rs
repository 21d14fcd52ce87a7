//! File-backed store for the single global high score record.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rapidclick_shared::protocol::SubmitScoreResponse;
use rapidclick_shared::types::{Score, ScoreRecord};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::ServerError;

#[derive(Debug)]
pub struct ScoreStore {
    path: PathBuf,
    /// Serializes read-compare-write so concurrent submissions cannot both
    /// overwrite from the same stale record.
    write_lock: Mutex<()>,
}

impl ScoreStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the data directory and a default `{0, null}` record if they do
    /// not exist yet. Safe to call on every startup.
    pub async fn initialize(&self) -> Result<(), ServerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    ServerError::StoreWrite(format!(
                        "Failed to create data directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        if fs::try_exists(&self.path).await.unwrap_or(false) {
            debug!(path = %self.path.display(), "Score file already present");
            return Ok(());
        }

        self.write(&ScoreRecord::default()).await?;
        info!(path = %self.path.display(), "Created score file with default values");
        Ok(())
    }

    pub async fn read(&self) -> Result<ScoreRecord, ServerError> {
        let data = fs::read_to_string(&self.path).await.map_err(|e| {
            ServerError::StoreRead(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;

        serde_json::from_str(&data).map_err(|e| {
            ServerError::StoreRead(format!("Corrupt score file '{}': {}", self.path.display(), e))
        })
    }

    /// Persist `score` if it is strictly greater than the stored one.
    pub async fn submit(&self, score: Score) -> Result<SubmitScoreResponse, ServerError> {
        let _guard = self.write_lock.lock().await;

        let current = self.read().await?;
        if score <= current.score {
            debug!(%score, high_score = %current.score, "Score below high score");
            return Ok(SubmitScoreResponse {
                is_new_high_score: false,
                high_score: current.score,
                submitted_score: score,
            });
        }

        self.write(&ScoreRecord::new(score, Utc::now())).await?;
        info!(%score, previous = %current.score, "New high score recorded");

        Ok(SubmitScoreResponse {
            is_new_high_score: true,
            high_score: score,
            submitted_score: score,
        })
    }

    /// Write to a sibling temp file, then rename over the record.
    async fn write(&self, record: &ScoreRecord) -> Result<(), ServerError> {
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ServerError::Internal(format!("Failed to encode score record: {e}")))?;

        let tmp = self.tmp_path();
        fs::write(&tmp, json).await.map_err(|e| {
            ServerError::StoreWrite(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            ServerError::StoreWrite(format!(
                "Failed to move '{}' into place: {}",
                tmp.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "scores.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> (ScoreStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::new(dir.path().join("data").join("scores.json"));
        store.initialize().await.unwrap();
        (store, dir)
    }

    async fn seed(store: &ScoreStore, score: u32) {
        store
            .write(&ScoreRecord::new(Score::from(score), Utc::now()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_initialize_creates_default_record() {
        let (store, _dir) = test_store().await;
        let record = store.read().await.unwrap();
        assert_eq!(record, ScoreRecord::default());

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json, serde_json::json!({ "score": 0, "date": null }));
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let (store, _dir) = test_store().await;
        seed(&store, 7).await;

        store.initialize().await.unwrap();
        assert_eq!(store.read().await.unwrap().score, Score::from(7));
    }

    #[tokio::test]
    async fn test_higher_score_replaces_record() {
        let (store, _dir) = test_store().await;
        seed(&store, 5).await;

        let resp = store.submit(Score::from(10)).await.unwrap();
        assert!(resp.is_new_high_score);
        assert_eq!(resp.high_score, Score::from(10));
        assert_eq!(resp.submitted_score, Score::from(10));

        let record = store.read().await.unwrap();
        assert_eq!(record.score, Score::from(10));
        assert!(record.date.is_some());
    }

    #[tokio::test]
    async fn test_lower_score_leaves_record() {
        let (store, _dir) = test_store().await;
        seed(&store, 5).await;
        let before = store.read().await.unwrap();

        let resp = store.submit(Score::from(3)).await.unwrap();
        assert!(!resp.is_new_high_score);
        assert_eq!(resp.high_score, Score::from(5));
        assert_eq!(resp.submitted_score, Score::from(3));
        assert_eq!(store.read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_tie_is_not_new_high_score() {
        let (store, _dir) = test_store().await;
        seed(&store, 5).await;

        let resp = store.submit(Score::from(5)).await.unwrap();
        assert!(!resp.is_new_high_score);
        assert_eq!(resp.high_score, Score::from(5));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_read_error() {
        let (store, _dir) = test_store().await;
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.read().await, Err(ServerError::StoreRead(_))));
        assert!(matches!(
            store.submit(Score::from(1)).await,
            Err(ServerError::StoreRead(_))
        ));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let (store, _dir) = test_store().await;
        seed(&store, 5).await;
        // A directory squatting on the temp path makes the write fail.
        std::fs::create_dir(store.tmp_path()).unwrap();

        let result = store.submit(Score::from(10)).await;
        assert!(matches!(result, Err(ServerError::StoreWrite(_))));
        assert_eq!(store.read().await.unwrap().score, Score::from(5));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_keep_maximum() {
        let (store, _dir) = test_store().await;
        let store = std::sync::Arc::new(store);

        let mut handles = Vec::new();
        for score in [3u32, 9, 4, 12, 7] {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.submit(Score::from(score)).await.unwrap()
            }));
        }
        let mut new_highs = 0;
        for handle in handles {
            if handle.await.unwrap().is_new_high_score {
                new_highs += 1;
            }
        }

        assert!(new_highs >= 1);
        assert_eq!(store.read().await.unwrap().score, Score::from(12));
    }
}
