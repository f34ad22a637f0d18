//! Router-level test wiring: real router, in-memory collaborators, HS256 sessions.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};

use emoji_shared::middleware::{detached_metrics_handle, SessionVerifier, SESSION_COOKIE};
use emoji_shared::types::{EmojiRecord, SessionClaims};

use crate::config::{AppConfig, DEFAULT_MODEL_VERSION};
use crate::events::EmojiFeed;
use crate::services::fakes::{FakeFetcher, FakeGenerator, FakeStore, MemoryEmojis, MemoryProfiles};
use crate::services::generation::{GenerationService, GenerationSettings};
use crate::{router, AppState};

pub const TEST_SECRET: &[u8] = b"test-session-secret";

pub fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        database_url: "postgres://unused".into(),
        db_pool_size: 1,
        replicate_api_token: "r8_test".into(),
        replicate_base_url: "http://replicate.invalid".into(),
        replicate_model_version: DEFAULT_MODEL_VERSION.into(),
        poll_interval_ms: 1,
        poll_timeout_ms: None,
        storage_endpoint: "http://storage.invalid".into(),
        storage_access_key: "key".into(),
        storage_secret_key: "secret".into(),
        storage_public_url: "https://store".into(),
        storage_bucket: "emojis".into(),
        storage_region: "us-east-1".into(),
        identity_jwt_public_key: String::new(),
        identity_sign_in_url: "/sign-in".into(),
        identity_sign_in_portal_url: Some("https://accounts.example.com/sign-in".into()),
        identity_issuer: None,
        profile_provision_timeout_ms: 500,
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub generator: Arc<FakeGenerator>,
    pub store: Arc<FakeStore>,
    pub emojis: Arc<MemoryEmojis>,
    pub profiles: Arc<MemoryProfiles>,
    pub feed: EmojiFeed,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(
            FakeGenerator::succeeding_after("J1", 1, vec!["https://gen/cat.png"]),
            MemoryEmojis::starting_at(42),
        )
    }

    pub fn with_rows(rows: Vec<EmojiRecord>) -> Self {
        Self::with(
            FakeGenerator::succeeding_after("J1", 1, vec!["https://gen/cat.png"]),
            MemoryEmojis::with_rows(rows),
        )
    }

    pub fn with(generator: FakeGenerator, emojis: MemoryEmojis) -> Self {
        let config = test_config();
        let generator = Arc::new(generator);
        let store = Arc::new(FakeStore::returning("https://store/u123_169999.png"));
        let emojis = Arc::new(emojis);
        let profiles = Arc::new(MemoryProfiles::default());
        let feed = EmojiFeed::default();

        let generation = GenerationService::new(
            generator.clone(),
            Arc::new(FakeFetcher::default()),
            store.clone(),
            emojis.clone(),
            feed.clone(),
            GenerationSettings {
                poll_interval: Duration::from_millis(1),
                poll_timeout: None,
            },
        );

        let state = Arc::new(AppState {
            config,
            sessions: SessionVerifier::from_secret(TEST_SECRET),
            emojis: emojis.clone(),
            profiles: profiles.clone(),
            generation,
            feed: feed.clone(),
            metrics_handle: detached_metrics_handle(),
        });

        Self {
            state,
            generator,
            store,
            emojis,
            profiles,
            feed,
        }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }
}

pub fn session_cookie(user_id: &str) -> String {
    let token = encode(
        &Header::default(),
        &SessionClaims::new(user_id, 3600),
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap();
    format!("{SESSION_COOKIE}={token}")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn authed_get(uri: &str, user_id: &str) -> Request<Body> {
    Request::get(uri)
        .header(COOKIE, session_cookie(user_id))
        .body(Body::empty())
        .unwrap()
}

pub fn authed_post_json(uri: &str, user_id: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(COOKIE, session_cookie(user_id))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
