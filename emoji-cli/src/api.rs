use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};

use emoji_shared::types::{
    ApiErrorResponse, EmojiListResponse, EmojiRecord, GenerateRequest, GenerateResponse,
};

use crate::sse::insert_records;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed stream frame: {0}")]
    Frame(#[from] serde_json::Error),
    #[error("invalid base url: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type InsertStream = BoxStream<'static, Result<EmojiRecord, ClientError>>;

/// The server endpoints the gallery client talks to.
#[async_trait]
pub trait GalleryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<EmojiRecord>, ClientError>;

    async fn toggle_like(&self, id: i64) -> Result<EmojiRecord, ClientError>;

    /// Opens the live insert stream. Dropping the stream closes the connection.
    async fn inserts(&self) -> Result<InsertStream, ClientError>;

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ClientError>;
}

pub struct HttpGalleryApi {
    client: Client,
    base_url: url::Url,
    session_token: Option<String>,
}

impl HttpGalleryApi {
    pub fn new(client: Client, base_url: &str, session_token: Option<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client,
            base_url: url::Url::parse(base_url)?,
            session_token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `POST /api/generate`; returns the stored image URL.
    pub async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        let request = self
            .client
            .post(self.endpoint("/api/generate")?)
            .json(&GenerateRequest {
                prompt: prompt.to_string(),
            });
        let response = checked(self.authed(request).send().await?).await?;
        let body: GenerateResponse = response.json().await?;
        body.output.into_iter().next().ok_or_else(|| ClientError::Api {
            status: 200,
            message: "generation returned no output".to_string(),
        })
    }
}

/// Turns non-2xx responses into `ClientError::Api`, keeping the server's message.
async fn checked(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl GalleryApi for HttpGalleryApi {
    async fn list(&self) -> Result<Vec<EmojiRecord>, ClientError> {
        let request = self.client.get(self.endpoint("/api/emojis")?);
        let response = checked(self.authed(request).send().await?).await?;
        let body: EmojiListResponse = response.json().await?;
        Ok(body.emojis)
    }

    async fn toggle_like(&self, id: i64) -> Result<EmojiRecord, ClientError> {
        let request = self.client.post(self.endpoint(&format!("/api/emojis/{id}/like"))?);
        let response = checked(self.authed(request).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn inserts(&self) -> Result<InsertStream, ClientError> {
        let request = self
            .client
            .get(self.endpoint("/api/emojis/stream")?)
            .header(reqwest::header::ACCEPT, "text/event-stream");
        let response = checked(self.authed(request).send().await?).await?;
        let chunks = response.bytes_stream().map(|chunk| chunk.map_err(ClientError::from));
        Ok(insert_records(chunks).boxed())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = checked(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
