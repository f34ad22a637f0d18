use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Set to `production` to switch log lines to JSON.
pub const LOG_ENV_VAR: &str = "EMOJI_MAKER_ENV";

fn default_directives(service_name: &str) -> String {
    format!(
        "info,{}=debug,emoji_shared=debug,tower_http=debug",
        service_name.replace('-', "_")
    )
}

/// Installs the global subscriber: JSON lines in production, human-readable otherwise.
pub fn init_tracing(service_name: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));

    let production = std::env::var(LOG_ENV_VAR).is_ok_and(|v| v == "production");
    let output = if production {
        fmt::layer().json().with_current_span(true).with_target(true).boxed()
    } else {
        fmt::layer().with_file(true).with_line_number(true).boxed()
    };

    tracing_subscriber::registry().with(filter).with(output).init();

    tracing::info!(service = service_name, json = production, "tracing initialized");
}
