//! Carebook Observability Module
//!
//! Provides:
//! - Console, rolling-file and JSON logging via `tracing`
//! - HTTP request/response logging
//! - Prometheus metrics for HTTP traffic and authentication events
//!
//! Everything beyond console logging can be disabled at compile time via the
//! `observability` feature flag. At runtime it is further controlled by the
//! `OBSERVABILITY_ENABLED` environment variable.
//!
//! # Examples
//!
//! ```no_run
//! use carebook_observability::init_tracing;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::{default_filter, init_basic_console_logging};

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_middleware, metrics_router, track_account_created,
    track_login_failure, track_login_success, track_token_refresh, track_tokens_issued,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Falls back to console logging.
    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn metrics_router() -> Option<Router> {
        None
    }

    pub fn track_account_created(_role: &str) {}
    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_tokens_issued(_kind: &str) {}
    pub fn track_token_refresh(_success: bool) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
