//! Axum router wiring.
//!
//! Every route, the scrape endpoint and the fallback included, runs through
//! `track_metrics`. The layer is added after the routes so it wraps each of
//! them and sees the matched route template.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, demo, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let metrics_path = state.cfg().metrics.path.clone();

    Router::new()
        .route("/health", get(ops::health))
        .route("/ready", get(ops::ready))
        .route(&metrics_path, get(ops::metrics))
        .route("/api", get(demo::api))
        .route("/slow", get(demo::slow))
        .route("/error", get(demo::error))
        .route("/user/:id", get(demo::user))
        .fallback(demo::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), obs::track_metrics))
        .with_state(state)
}
