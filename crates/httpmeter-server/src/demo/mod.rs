//! Simulated application endpoints.
//!
//! These exist to drive traffic through the instrumentation: a plain JSON
//! reply, a slow reply, a failing reply, and a parameterised route.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::config::DemoSection;

pub async fn api() -> Json<Value> {
    Json(json!({ "message": "Hello from httpmeter" }))
}

pub async fn slow(State(state): State<AppState>) -> Json<Value> {
    let delay = slow_delay(&state.cfg().demo);
    tokio::time::sleep(delay).await;
    Json(json!({ "message": format!("Slow response ({}ms)", delay.as_millis()) }))
}

pub async fn error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Simulated internal error" })),
    )
}

pub async fn user(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "id": id }))
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

/// `slow_min_ms` plus up to `slow_jitter_ms`, jitter seeded from the clock.
pub fn slow_delay(demo: &DemoSection) -> Duration {
    let jitter = if demo.slow_jitter_ms == 0 {
        0
    } else {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos();
        u64::from(nanos) % (demo.slow_jitter_ms + 1)
    };
    Duration::from_millis(demo.slow_min_ms + jitter)
}
