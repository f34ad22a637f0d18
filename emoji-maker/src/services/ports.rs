//! Seams between the workflows and the managed services they call.
//!
//! Production wiring lives in `adapters` (Replicate, S3, HTTP download) and
//! `diesel_store` (Postgres). Tests plug in the in-memory `fakes`.

use emoji_shared::clients::replicate::ReplicateError;
use emoji_shared::clients::storage::StorageError;
use emoji_shared::types::EmojiRecord;

use crate::models::{NewEmoji, NewProfile, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

/// Snapshot of an asynchronous generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub id: String,
    pub status: JobStatus,
    pub outputs: Vec<String>,
    pub error: Option<String>,
}

/// Transport or API failure while talking to the generator, downloader, or bucket.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Generator(#[from] ReplicateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("image download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("blocking task failed: {0}")]
    Task(String),
}

#[axum::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Submit a prompt; returns as soon as the job is accepted.
    async fn submit(&self, prompt: &str) -> Result<GenerationJob, UpstreamError>;

    async fn fetch_job(&self, job_id: &str) -> Result<GenerationJob, UpstreamError>;
}

#[axum::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError>;
}

#[axum::async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes under `key`; returns the public URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, UpstreamError>;
}

#[axum::async_trait]
pub trait EmojiRepository: Send + Sync {
    async fn insert(&self, emoji: NewEmoji) -> Result<EmojiRecord, StoreError>;

    /// All rows, `created_at` descending.
    async fn list_newest_first(&self) -> Result<Vec<EmojiRecord>, StoreError>;

    /// Current stored count (`None` when the column is NULL).
    /// `StoreError::NotFound` when no row has this id.
    async fn likes_count(&self, id: i64) -> Result<Option<i32>, StoreError>;

    async fn set_likes_count(&self, id: i64, likes_count: i32) -> Result<EmojiRecord, StoreError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[axum::async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Inserts unless a row for the user already exists. Returns whether a row was written.
    async fn insert_if_absent(&self, profile: NewProfile) -> Result<bool, StoreError>;
}

impl From<StoreError> for emoji_shared::AppError {
    fn from(err: StoreError) -> Self {
        use emoji_shared::{AppError, ErrorCode};

        match err {
            StoreError::NotFound => AppError::not_found("emoji not found"),
            other => AppError::new(ErrorCode::UpstreamUnavailable, other.to_string()),
        }
    }
}
