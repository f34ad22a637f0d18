//! Prompt → generated image → object storage → `emojis` row.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use emoji_shared::errors::{AppError, ErrorCode};
use emoji_shared::types::AuthUser;

use crate::events::EmojiFeed;
use crate::models::NewEmoji;

use super::ports::{
    EmojiRepository, GenerationJob, ImageFetcher, ImageGenerator, ImageStore, JobStatus,
    StoreError, UpstreamError,
};

/// Marker token the emoji model was fine-tuned on.
pub const PROMPT_PREFIX: &str = "A TOK emoji of a ";
pub const IMAGE_CONTENT_TYPE: &str = "image/png";
pub const IMAGE_CACHE_CONTROL: &str = "max-age=3600";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no authenticated user")]
    Unauthorized,
    #[error("unreadable request: {0}")]
    InvalidRequest(String),
    #[error("generation job {job_id} failed: {reason}")]
    JobFailed { job_id: String, reason: String },
    #[error("generation job {job_id} produced no output")]
    EmptyOutput { job_id: String },
    #[error("generation job {job_id} still pending after {waited:?}")]
    TimedOut { job_id: String, waited: Duration },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        let code = match &err {
            GenerationError::Unauthorized => return AppError::unauthorized("Unauthorized"),
            GenerationError::InvalidRequest(_)
            | GenerationError::JobFailed { .. }
            | GenerationError::EmptyOutput { .. }
            | GenerationError::TimedOut { .. } => ErrorCode::GenerationFailed,
            GenerationError::Upstream(_) | GenerationError::Store(_) => {
                ErrorCode::UpstreamUnavailable
            }
        };
        tracing::error!(error = %err, code = code.code(), "emoji generation failed");
        AppError::new(code, "Error generating emoji")
    }
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub poll_interval: Duration,
    /// `None` polls for as long as the job stays pending.
    pub poll_timeout: Option<Duration>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            poll_timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn ImageGenerator>,
    fetcher: Arc<dyn ImageFetcher>,
    store: Arc<dyn ImageStore>,
    emojis: Arc<dyn EmojiRepository>,
    feed: EmojiFeed,
    settings: GenerationSettings,
}

impl GenerationService {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        fetcher: Arc<dyn ImageFetcher>,
        store: Arc<dyn ImageStore>,
        emojis: Arc<dyn EmojiRepository>,
        feed: EmojiFeed,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            generator,
            fetcher,
            store,
            emojis,
            feed,
            settings,
        }
    }

    /// Generates one emoji for `user` and returns its public storage URL.
    ///
    /// Nothing is persisted unless the job succeeds. An upload whose row
    /// insert then fails is left in the bucket.
    pub async fn generate(
        &self,
        prompt: &str,
        user: Option<&AuthUser>,
    ) -> Result<String, GenerationError> {
        let user = user.ok_or(GenerationError::Unauthorized)?;

        let submitted = format!("{PROMPT_PREFIX}{prompt}");
        let job = self.generator.submit(&submitted).await?;
        tracing::info!(job_id = %job.id, user_id = %user.id, "generation job submitted");

        let job = self.wait_for_job(job).await?;
        if job.status == JobStatus::Failed {
            return Err(GenerationError::JobFailed {
                reason: job.error.unwrap_or_else(|| "unknown".to_string()),
                job_id: job.id,
            });
        }

        let source_url = job
            .outputs
            .first()
            .ok_or_else(|| GenerationError::EmptyOutput { job_id: job.id.clone() })?;

        let bytes = self.fetcher.fetch(source_url).await?;
        let key = object_key(&user.id, Utc::now().timestamp_millis());
        let image_url = self
            .store
            .put(&key, bytes, IMAGE_CONTENT_TYPE, IMAGE_CACHE_CONTROL)
            .await?;

        let record = self
            .emojis
            .insert(NewEmoji {
                image_url: image_url.clone(),
                prompt: prompt.to_string(),
                creator_user_id: user.id.clone(),
                likes_count: 0,
            })
            .await?;

        tracing::info!(
            emoji_id = record.id,
            job_id = %job.id,
            image_url = %image_url,
            "emoji stored"
        );
        self.feed.publish_insert(record);

        Ok(image_url)
    }

    /// Re-fetches the job every `poll_interval` until it leaves `Pending`.
    async fn wait_for_job(&self, mut job: GenerationJob) -> Result<GenerationJob, GenerationError> {
        let started = Instant::now();
        let mut polls: u32 = 0;

        while job.status == JobStatus::Pending {
            if let Some(limit) = self.settings.poll_timeout {
                if started.elapsed() >= limit {
                    return Err(GenerationError::TimedOut {
                        job_id: job.id,
                        waited: started.elapsed(),
                    });
                }
            }

            tokio::time::sleep(self.settings.poll_interval).await;
            job = self.generator.fetch_job(&job.id).await?;
            polls += 1;
        }

        tracing::debug!(job_id = %job.id, polls, status = ?job.status, "generation job settled");
        Ok(job)
    }
}

/// `{user_id}_{unix_millis}.png`, unique per user and request.
pub fn object_key(user_id: &str, unix_millis: i64) -> String {
    format!("{user_id}_{unix_millis}.png")
}
