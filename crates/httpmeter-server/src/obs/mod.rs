//! Request instrumentation.
//!
//! `HttpMetrics` owns the standard HTTP metrics and turns the two structured
//! calls a request makes (start with method + route, finish with status) into
//! counter and histogram updates. `track_metrics` is the axum middleware that
//! makes those calls for every routed request.

pub mod http_metrics;
pub mod middleware;

pub use http_metrics::{HttpMetrics, RequestObservation};
pub use middleware::{method_label, route_label, track_metrics, OTHER_METHOD, UNMATCHED_ROUTE};
