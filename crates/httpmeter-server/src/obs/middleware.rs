//! Axum middleware recording every routed request.

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Route label for requests no route matched. Keeps 404 scans from minting
/// one series per scanned URL.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Method label for extension methods outside the standard set.
pub const OTHER_METHOD: &str = "OTHER";

/// Record count, error count and latency for one request.
///
/// Instrumentation errors are logged and dropped; the response always goes
/// out unchanged.
pub async fn track_metrics(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = route_label(&req);
    let obs = state.http_metrics().begin(method_label(req.method()), &route);

    let response = next.run(req).await;

    let status = response.status().as_u16();
    if let Err(e) = obs.finish(status) {
        tracing::warn!(error = %e, code = e.code().as_str(), %route, status, "request instrumentation failed");
    }
    response
}

/// The matched route template (`/user/:id`), never the raw request path.
pub fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned())
}

/// Standard methods pass through; any other token the client sends is `OTHER`.
pub fn method_label(method: &Method) -> &str {
    match *method {
        Method::GET
        | Method::HEAD
        | Method::POST
        | Method::PUT
        | Method::DELETE
        | Method::CONNECT
        | Method::OPTIONS
        | Method::TRACE
        | Method::PATCH => method.as_str(),
        _ => OTHER_METHOD,
    }
}
