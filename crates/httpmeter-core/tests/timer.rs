#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use httpmeter_core::{Histogram, HistogramOpts, MetricRegistry};

fn latency(registry: &MetricRegistry, labels: &[&str]) -> Arc<Histogram> {
    registry
        .register_histogram(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .label_names(labels)
                .buckets(vec![0.1, 0.3, 0.5]),
        )
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn stop_after_150ms_lands_between_bounds() {
    let registry = MetricRegistry::new();
    let h = latency(&registry, &["method", "route"]);

    let mut timer = h.start_timer(&[("method", "GET"), ("route", "/slow")]);
    tokio::time::advance(Duration::from_millis(150)).await;
    let secs = timer.stop(&[]).unwrap();

    assert_eq!(secs, 0.15);
    let snap = h.snapshot(&["GET", "/slow"]).unwrap();
    assert_eq!(snap.buckets, vec![0, 1, 1, 1]);
    assert_eq!(snap.count, 1);
}

#[tokio::test(start_paused = true)]
async fn labels_can_be_completed_at_stop() {
    let registry = MetricRegistry::new();
    let h = latency(&registry, &["method", "route", "status"]);

    let mut timer = h.start_timer(&[("method", "GET"), ("route", "/api"), ("status", "pending")]);
    tokio::time::advance(Duration::from_millis(40)).await;
    timer.stop(&[("status", "503")]).unwrap();

    assert_eq!(h.snapshot(&["GET", "/api", "503"]).unwrap().count, 1);
    assert_eq!(h.snapshot(&["GET", "/api", "pending"]).unwrap().count, 0);
    assert_eq!(h.cardinality(), 1);
}

#[tokio::test(start_paused = true)]
async fn second_stop_is_an_error() {
    let registry = MetricRegistry::new();
    let h = latency(&registry, &["method", "route"]);

    let mut timer = h.start_timer(&[("method", "GET")]);
    timer.stop(&[("route", "/api")]).unwrap();
    assert!(timer.is_stopped());

    let err = timer.stop(&[("route", "/api")]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "TIMER_ALREADY_STOPPED");
    assert_eq!(h.snapshot(&["GET", "/api"]).unwrap().count, 1);
}

#[test]
fn dropped_timer_records_nothing() {
    let registry = MetricRegistry::new();
    let h = latency(&registry, &["method", "route"]);

    let timer = h.start_timer(&[("method", "GET"), ("route", "/api")]);
    drop(timer);

    assert_eq!(h.cardinality(), 0);
}

#[test]
fn incomplete_labels_fail_at_stop() {
    let registry = MetricRegistry::new();
    let h = latency(&registry, &["method", "route"]);

    let mut timer = h.start_timer(&[("method", "GET")]);
    let err = timer.stop(&[]).expect_err("route missing");
    assert_eq!(err.code().as_str(), "LABEL_ARITY_MISMATCH");
    assert_eq!(h.cardinality(), 0);
}
