//! Minimal client for Replicate's predictions API.
//!
//! Only the two calls the generation workflow needs: create a prediction and
//! fetch its current state. Predictions are asynchronous; callers poll.

use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    #[error("replicate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("replicate returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl Prediction {
    /// Output URLs in the order the model produced them.
    ///
    /// Image models return either a list of URLs or a single URL string.
    pub fn output_urls(&self) -> Vec<String> {
        match &self.output {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(serde_json::Value::String(url)) => vec![url.clone()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionInput<'a> {
    pub prompt: &'a str,
    pub apply_watermark: bool,
}

#[derive(Debug, Serialize)]
struct CreatePredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Clone)]
pub struct ReplicateClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl ReplicateClient {
    pub fn new(client: Client, base_url: &str, api_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    pub async fn create_prediction(
        &self,
        version: &str,
        input: PredictionInput<'_>,
    ) -> Result<Prediction, ReplicateError> {
        let request = CreatePredictionRequest { version, input };

        let response = self
            .client
            .post(format!("{}/predictions", self.base_url))
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let prediction = Self::parse(response).await?;
        tracing::debug!(prediction_id = %prediction.id, status = ?prediction.status, "prediction created");
        Ok(prediction)
    }

    pub async fn get_prediction(&self, id: &str) -> Result<Prediction, ReplicateError> {
        let response = self
            .client
            .get(format!("{}/predictions/{}", self.base_url, id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<Prediction, ReplicateError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplicateError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Prediction>().await?)
    }
}
