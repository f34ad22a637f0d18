use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Connection settings for an S3-compatible bucket (Supabase Storage, MinIO, S3).
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Base URL under which objects are publicly readable, without the bucket.
    pub public_url: String,
}

#[derive(Clone)]
pub struct ObjectStorage {
    client: S3Client,
    bucket: String,
    public_url: String,
}

impl ObjectStorage {
    pub fn new(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None,
            None,
            "emoji-maker",
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&settings.endpoint)
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        tracing::info!(
            endpoint = %settings.endpoint,
            bucket = %settings.bucket,
            "object storage client initialized"
        );

        Self {
            client: S3Client::from_conf(config),
            bucket: settings.bucket.clone(),
            public_url: settings.public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload an object and return its public URL.
    pub async fn upload(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body.into())
            .content_type(content_type)
            .cache_control(cache_control)
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(&e).to_string()))?;

        Ok(self.public_url(key))
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, self.bucket, key)
    }
}
