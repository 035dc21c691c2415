#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use httpmeter_core::{MetricRegistry, Opts};
use httpmeter_server::{
    app_state::AppState,
    config,
    obs::{OTHER_METHOD, UNMATCHED_ROUTE},
    router,
};

fn state() -> AppState {
    let cfg = config::load_from_str(
        r#"
version: 1
demo:
  slow_min_ms: 0
  slow_jitter_ms: 0
"#,
    )
    .unwrap();
    AppState::new(cfg).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn successful_requests_are_counted_and_timed() {
    let state = state();
    let app = router::build_router(state.clone());

    for _ in 0..2 {
        let (status, _) = get(&app, "/api").await;
        assert_eq!(status, StatusCode::OK);
    }
    get(&app, "/slow").await;

    let http = state.http_metrics();
    assert_eq!(http.requests().value(&["GET", "/api", "200"]).unwrap(), 2);
    assert_eq!(http.requests().value(&["GET", "/slow", "200"]).unwrap(), 1);
    assert_eq!(http.errors().cardinality(), 0);

    let snap = http.duration().snapshot(&["GET", "/api"]).unwrap();
    assert_eq!(snap.count, 2);
    assert_eq!(*snap.buckets.last().unwrap(), 2);
}

#[tokio::test]
async fn error_responses_feed_the_error_counter() {
    let state = state();
    let app = router::build_router(state.clone());

    let (status, body) = get(&app, "/error").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Simulated internal error"));

    let http = state.http_metrics();
    assert_eq!(http.requests().value(&["GET", "/error", "500"]).unwrap(), 1);
    assert_eq!(http.errors().value(&["/error", "500"]).unwrap(), 1);
}

#[tokio::test]
async fn dynamic_paths_collapse_to_one_series() {
    let state = state();
    let app = router::build_router(state.clone());

    for id in 0..1000 {
        let (status, _) = get(&app, &format!("/user/{id}?ref=test")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let http = state.http_metrics();
    assert_eq!(http.requests().cardinality(), 1);
    assert_eq!(http.requests().value(&["GET", "/user/:id", "200"]).unwrap(), 1000);
    assert_eq!(http.duration().cardinality(), 1);
    assert_eq!(http.duration().snapshot(&["GET", "/user/:id"]).unwrap().count, 1000);
}

#[tokio::test]
async fn unmatched_paths_share_one_label() {
    let state = state();
    let app = router::build_router(state.clone());

    for i in 0..50 {
        let (status, _) = get(&app, &format!("/scan/{i}/wp-login.php")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let http = state.http_metrics();
    assert_eq!(http.requests().cardinality(), 1);
    assert_eq!(http.requests().value(&["GET", UNMATCHED_ROUTE, "404"]).unwrap(), 50);
    assert_eq!(http.errors().value(&[UNMATCHED_ROUTE, "404"]).unwrap(), 50);
}

#[tokio::test]
async fn extension_methods_share_one_label() {
    let state = state();
    let app = router::build_router(state.clone());

    for i in 0..500 {
        let req = Request::builder()
            .method(format!("X{i}").as_str())
            .uri("/api")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
    get(&app, "/api").await;

    let http = state.http_metrics();
    assert_eq!(http.requests().cardinality(), 2);
    assert_eq!(http.requests().value(&[OTHER_METHOD, "/api", "405"]).unwrap(), 500);
    assert_eq!(http.requests().value(&["GET", "/api", "200"]).unwrap(), 1);
    assert_eq!(http.duration().cardinality(), 2);
    assert_eq!(http.duration().snapshot(&[OTHER_METHOD, "/api"]).unwrap().count, 500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_requests_lose_no_updates() {
    let state = state();
    let app = router::build_router(state.clone());

    let tasks: Vec<_> = (0..400)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { get(&app, "/health").await })
        })
        .collect();
    for r in futures_util::future::join_all(tasks).await {
        assert_eq!(r.unwrap().0, StatusCode::OK);
    }

    let http = state.http_metrics();
    assert_eq!(http.requests().value(&["GET", "/health", "200"]).unwrap(), 400);
    assert_eq!(http.duration().snapshot(&["GET", "/health"]).unwrap().count, 400);
}

#[tokio::test]
async fn scrape_endpoint_serves_exposition_text() {
    let state = state();
    let app = router::build_router(state.clone());

    for _ in 0..3 {
        get(&app, "/api").await;
    }

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();

    let lines: Vec<&str> = body.lines().collect();
    assert!(lines.contains(&r#"http_requests_total{method="GET",route="/api",status="200"} 3"#));
    assert!(lines.contains(&"# TYPE http_request_duration_seconds histogram"));
    assert!(lines.contains(&r#"http_request_duration_seconds_count{method="GET",route="/api"} 3"#));
    assert!(lines.contains(&"# HELP http_requests_errors_total Total number of HTTP error responses"));

    // the scrape itself is recorded once it completes
    let (_, body) = get(&app, "/metrics").await;
    assert!(body.contains(r#"http_requests_total{method="GET",route="/metrics",status="200"} 1"#));
}

#[tokio::test]
async fn readiness_reports_draining() {
    let state = state();
    let app = router::build_router(state.clone());

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ready"));

    state.set_draining();
    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("draining"));
    assert_eq!(
        state.http_metrics().errors().value(&["/ready", "503"]).unwrap(),
        1
    );
}

#[test]
fn duplicate_http_metric_fails_startup() {
    let registry = Arc::new(MetricRegistry::new());
    registry
        .register_counter(Opts::new("http_requests_total", "already here"))
        .unwrap();

    let err = AppState::with_registry(config::AppConfig::default(), Arc::clone(&registry))
        .err()
        .expect("startup must fail");
    assert_eq!(err.code().as_str(), "DUPLICATE_METRIC_NAME");
    assert_eq!(registry.len(), 1);
}

#[test]
fn custom_metrics_share_the_injected_registry() {
    let registry = Arc::new(MetricRegistry::new());
    let jobs = registry
        .register_counter(Opts::new("jobs_total", "Jobs processed").label_names(&["kind"]))
        .unwrap();
    let state = AppState::with_registry(config::AppConfig::default(), Arc::clone(&registry)).unwrap();
    jobs.inc(&["import"]).unwrap();

    let names: Vec<String> = state.registry().metrics().iter().map(|m| m.name().to_string()).collect();
    assert_eq!(
        names,
        [
            "jobs_total",
            "http_requests_total",
            "http_requests_errors_total",
            "http_request_duration_seconds"
        ]
    );
}
