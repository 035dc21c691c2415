#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use httpmeter_core::MetricRegistry;
use httpmeter_server::obs::HttpMetrics;

fn metrics() -> (MetricRegistry, HttpMetrics) {
    let registry = MetricRegistry::new();
    let http = HttpMetrics::register(&registry, vec![0.1, 0.3, 0.5]).unwrap();
    (registry, http)
}

#[tokio::test(start_paused = true)]
async fn finish_records_count_and_latency() {
    let (_registry, http) = metrics();

    let obs = http.begin("GET", "/slow");
    tokio::time::advance(Duration::from_millis(150)).await;
    obs.finish(200).unwrap();

    assert_eq!(http.requests().value(&["GET", "/slow", "200"]).unwrap(), 1);
    assert_eq!(http.errors().cardinality(), 0);
    let snap = http.duration().snapshot(&["GET", "/slow"]).unwrap();
    assert_eq!(snap.buckets, vec![0, 1, 1, 1]);
}

#[test]
fn client_and_server_errors_are_counted() {
    let (_registry, http) = metrics();

    http.begin("GET", "/api").finish(399).unwrap();
    http.begin("GET", "/api").finish(400).unwrap();
    http.begin("POST", "/api").finish(503).unwrap();

    assert_eq!(http.errors().value(&["/api", "400"]).unwrap(), 1);
    assert_eq!(http.errors().value(&["/api", "503"]).unwrap(), 1);
    assert_eq!(http.errors().value(&["/api", "399"]).unwrap(), 0);
    assert_eq!(http.requests().cardinality(), 3);
}

#[test]
fn abandoned_request_records_nothing() {
    let (_registry, http) = metrics();

    let obs = http.begin("GET", "/slow");
    assert_eq!(obs.route(), "/slow");
    drop(obs);

    assert_eq!(http.requests().cardinality(), 0);
    assert_eq!(http.duration().cardinality(), 0);
}
