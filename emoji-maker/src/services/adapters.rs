use emoji_shared::clients::fetch::HttpFetcher;
use emoji_shared::clients::replicate::{
    Prediction, PredictionInput, PredictionStatus, ReplicateClient,
};
use emoji_shared::clients::storage::ObjectStorage;

use super::ports::{GenerationJob, ImageFetcher, ImageGenerator, ImageStore, JobStatus, UpstreamError};

/// Runs prompts through one pinned Replicate model version.
pub struct ReplicateGenerator {
    client: ReplicateClient,
    model_version: String,
}

impl ReplicateGenerator {
    pub fn new(client: ReplicateClient, model_version: impl Into<String>) -> Self {
        Self {
            client,
            model_version: model_version.into(),
        }
    }
}

fn job_status(status: PredictionStatus) -> JobStatus {
    match status {
        PredictionStatus::Starting | PredictionStatus::Processing => JobStatus::Pending,
        PredictionStatus::Succeeded => JobStatus::Succeeded,
        PredictionStatus::Failed | PredictionStatus::Canceled => JobStatus::Failed,
    }
}

impl From<Prediction> for GenerationJob {
    fn from(prediction: Prediction) -> Self {
        let outputs = prediction.output_urls();
        Self {
            status: job_status(prediction.status),
            error: prediction.error.as_ref().map(|e| match e {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            id: prediction.id,
            outputs,
        }
    }
}

#[axum::async_trait]
impl ImageGenerator for ReplicateGenerator {
    async fn submit(&self, prompt: &str) -> Result<GenerationJob, UpstreamError> {
        let input = PredictionInput {
            prompt,
            apply_watermark: false,
        };
        let prediction = self.client.create_prediction(&self.model_version, input).await?;
        Ok(prediction.into())
    }

    async fn fetch_job(&self, job_id: &str) -> Result<GenerationJob, UpstreamError> {
        Ok(self.client.get_prediction(job_id).await?.into())
    }
}

#[axum::async_trait]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        Ok(self.fetch_bytes(url).await?)
    }
}

#[axum::async_trait]
impl ImageStore for ObjectStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, UpstreamError> {
        Ok(self.upload(key, bytes, content_type, cache_control).await?)
    }
}
