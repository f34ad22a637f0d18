use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use std::time::Duration;

use emoji_shared::types::{HealthCheck, HealthResponse, HealthStatus};

use crate::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(3);

/// Liveness plus a round trip to the relational store.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let database = match tokio::time::timeout(PING_TIMEOUT, state.emojis.ping()).await {
        Ok(Ok(())) => HealthCheck {
            name: "database".to_string(),
            status: HealthStatus::Healthy,
            message: None,
        },
        Ok(Err(e)) => HealthCheck {
            name: "database".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
        },
        Err(_) => HealthCheck {
            name: "database".to_string(),
            status: HealthStatus::Degraded,
            message: Some(format!("no reply within {PING_TIMEOUT:?}")),
        },
    };

    let response = HealthResponse::healthy("emoji-maker", env!("CARGO_PKG_VERSION"))
        .with_checks(vec![database]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
