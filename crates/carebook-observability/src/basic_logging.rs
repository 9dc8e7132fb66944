use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const WORKSPACE_TARGETS: [&str; 6] = [
    "carebook",
    "carebook_auth",
    "carebook_db",
    "carebook_session",
    "carebook_cli",
    "carebook_observability",
];

/// Filter directives used when `RUST_LOG` is not set: workspace crates at
/// `log_level`, noisy dependencies at warn.
pub fn default_filter(log_level: &str) -> String {
    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.extend(
        ["tower_http=warn", "hyper=warn", "h2=warn", "sqlx=warn"]
            .iter()
            .map(|d| d.to_string()),
    );
    directives.join(",")
}

pub(crate) fn env_filter() -> EnvFilter {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(&log_level)))
}

/// Initialize console-only logging.
///
/// Used by the CLI and by the server when observability is disabled.
///
/// # Configuration
///
/// - **Log Level**: `LOG_LEVEL` (default: "info"), overridden entirely by `RUST_LOG`
/// - **Format**: Compact with ANSI colors and module paths
pub fn init_basic_console_logging() {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(console_layer).init();
}
