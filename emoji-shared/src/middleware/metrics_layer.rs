use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tokio::time::Instant;

/// Records one counter sample and one latency sample per request, labelled by
/// route template (`/api/emojis/:id/like`, not the concrete id).
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_owned();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("route", route),
        ("status", response.status().as_u16().to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(started.elapsed().as_secs_f64());

    response
}

fn describe() {
    describe_counter!("http_requests_total", "HTTP requests served");
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "Time from request to response headers"
    );
    describe_counter!("emoji_generations_total", "Generate requests by outcome");
    describe_counter!("emoji_likes_total", "Like toggles by resulting action");
}

/// Installs the process-wide Prometheus recorder. Call once, from `main`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe();
    Ok(handle)
}

/// A handle whose recorder is never installed globally, for building routers in tests.
pub fn detached_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
