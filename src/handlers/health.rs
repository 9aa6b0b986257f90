use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::time::Instant;

use crate::AppState;

/// Tracks application start time for uptime reporting.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call this on application startup).
pub fn init_start_time() {
    let _ = START_TIME.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// Liveness probe. The service has no external dependencies to check, so
/// liveness is the whole story.
async fn liveness_check() -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(liveness_check))
}
