use serde::Deserialize;
use std::time::Duration;

use emoji_shared::clients::storage::StorageSettings;

/// Replicate model version of `fofr/sdxl-emoji`.
pub const DEFAULT_MODEL_VERSION: &str =
    "dee76b5afde21b0f01ed7925f0665b7e879c50ee718c5f78a9d38e04d523cc5e";

/// Service configuration, read from `EMOJI_MAKER_*` environment variables.
///
/// Credentials and endpoints have no defaults: a missing value is a startup
/// failure, not something to recover from at request time.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    // Relational store
    pub database_url: String,
    #[serde(default = "default_db_pool_size")]
    pub db_pool_size: u32,

    // Image generator
    pub replicate_api_token: String,
    #[serde(default = "default_replicate_base_url")]
    pub replicate_base_url: String,
    #[serde(default = "default_model_version")]
    pub replicate_model_version: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Unset means poll until the job leaves the pending state.
    #[serde(default)]
    pub poll_timeout_ms: Option<u64>,

    // Object store
    pub storage_endpoint: String,
    pub storage_access_key: String,
    pub storage_secret_key: String,
    pub storage_public_url: String,
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
    #[serde(default = "default_storage_region")]
    pub storage_region: String,

    // Identity provider
    pub identity_jwt_public_key: String,
    pub identity_sign_in_url: String,
    #[serde(default)]
    pub identity_sign_in_portal_url: Option<String>,
    #[serde(default)]
    pub identity_issuer: Option<String>,
    #[serde(default = "default_profile_provision_timeout_ms")]
    pub profile_provision_timeout_ms: u64,
}

fn default_port() -> u16 { 3000 }
fn default_db_pool_size() -> u32 { 10 }
fn default_replicate_base_url() -> String { "https://api.replicate.com/v1".into() }
fn default_model_version() -> String { DEFAULT_MODEL_VERSION.into() }
fn default_poll_interval_ms() -> u64 { 1000 }
fn default_storage_bucket() -> String { "emojis".into() }
fn default_storage_region() -> String { "us-east-1".into() }
fn default_profile_provision_timeout_ms() -> u64 { 2000 }

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("EMOJI_MAKER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let config: Self = config.try_deserialize()?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_ms.map(Duration::from_millis)
    }

    pub fn profile_provision_timeout(&self) -> Duration {
        Duration::from_millis(self.profile_provision_timeout_ms)
    }

    /// PEM keys often arrive through env files with escaped newlines.
    pub fn identity_public_key_pem(&self) -> String {
        self.identity_jwt_public_key.replace("\\n", "\n")
    }

    pub fn storage_settings(&self) -> StorageSettings {
        StorageSettings {
            endpoint: self.storage_endpoint.clone(),
            region: self.storage_region.clone(),
            access_key: self.storage_access_key.clone(),
            secret_key: self.storage_secret_key.clone(),
            bucket: self.storage_bucket.clone(),
            public_url: self.storage_public_url.clone(),
        }
    }
}
