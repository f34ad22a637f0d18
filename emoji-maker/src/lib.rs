pub mod config;
pub mod events;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod views;

#[cfg(test)]
pub mod test_support;

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use emoji_shared::middleware::{metrics_middleware, SessionVerifier};

use config::AppConfig;
use events::EmojiFeed;
use services::generation::GenerationService;
use services::ports::{EmojiRepository, ProfileRepository};

/// Process-wide clients and settings, built once in `main`.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionVerifier,
    pub emojis: Arc<dyn EmojiRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub generation: GenerationService,
    pub feed: EmojiFeed,
    pub metrics_handle: PrometheusHandle,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::pages::index))
        .route("/sign-in", get(routes::pages::sign_in))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/api/emojis", get(routes::emojis::list_emojis))
        .route("/api/emojis/stream", get(routes::stream::emoji_stream))
        .route("/api/emojis/:id/like", post(routes::emojis::toggle_like))
        .route("/api/generate", post(routes::generate::generate_emoji))
        .fallback(routes::pages::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::access_gate::access_gate,
        ))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
