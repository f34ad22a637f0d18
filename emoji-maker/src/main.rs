use std::sync::Arc;
use std::time::Duration;

use emoji_shared::clients::db::create_pool;
use emoji_shared::clients::fetch::HttpFetcher;
use emoji_shared::clients::replicate::ReplicateClient;
use emoji_shared::clients::storage::ObjectStorage;
use emoji_shared::middleware::{init_metrics, init_tracing, SessionVerifier};

use emoji_maker::config::AppConfig;
use emoji_maker::events::EmojiFeed;
use emoji_maker::services::adapters::ReplicateGenerator;
use emoji_maker::services::diesel_store::{PgEmojiRepository, PgProfileRepository};
use emoji_maker::services::generation::{GenerationService, GenerationSettings};
use emoji_maker::{router, AppState};

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("emoji-maker");

    let config = AppConfig::load()?;
    let port = config.port;
    let metrics_handle = init_metrics()?;

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let mut sessions = SessionVerifier::from_rsa_pem(&config.identity_public_key_pem())?;
    if let Some(issuer) = &config.identity_issuer {
        sessions = sessions.with_issuer(issuer);
    }

    let emojis = Arc::new(PgEmojiRepository::new(db.clone()));
    let profiles = Arc::new(PgProfileRepository::new(db));
    let feed = EmojiFeed::default();

    let generation = GenerationService::new(
        Arc::new(ReplicateGenerator::new(
            ReplicateClient::new(http.clone(), &config.replicate_base_url, &config.replicate_api_token),
            config.replicate_model_version.clone(),
        )),
        Arc::new(HttpFetcher::new(http)),
        Arc::new(ObjectStorage::new(&config.storage_settings())),
        emojis.clone(),
        feed.clone(),
        GenerationSettings {
            poll_interval: config.poll_interval(),
            poll_timeout: config.poll_timeout(),
        },
    );

    let state = Arc::new(AppState {
        config,
        sessions,
        emojis,
        profiles,
        generation,
        feed,
        metrics_handle,
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "emoji-maker starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
