use std::sync::Arc;

use httpmeter_core::error::Result;
use httpmeter_core::{Counter, Histogram, HistogramOpts, MetricRegistry, Opts, Timer};

/// Standard HTTP metrics, registered once per registry.
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    requests: Arc<Counter>,
    errors: Arc<Counter>,
    duration: Arc<Histogram>,
}

impl HttpMetrics {
    /// Register `http_requests_total`, `http_requests_errors_total` and
    /// `http_request_duration_seconds`. Fails if any name is taken.
    pub fn register(registry: &MetricRegistry, latency_buckets: Vec<f64>) -> Result<Self> {
        let requests = registry.register_counter(
            Opts::new("http_requests_total", "Total number of HTTP requests")
                .label_names(&["method", "route", "status"]),
        )?;
        let errors = registry.register_counter(
            Opts::new("http_requests_errors_total", "Total number of HTTP error responses")
                .label_names(&["route", "status"]),
        )?;
        let duration = registry.register_histogram(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .label_names(&["method", "route"])
                .buckets(latency_buckets),
        )?;
        Ok(Self {
            requests,
            errors,
            duration,
        })
    }

    /// Request start. `route` must be the route template, never the raw path.
    pub fn begin(&self, method: &str, route: &str) -> RequestObservation {
        RequestObservation {
            method: method.to_owned(),
            route: route.to_owned(),
            timer: self
                .duration
                .start_timer(&[("method", method), ("route", route)]),
            metrics: self.clone(),
        }
    }

    pub fn requests(&self) -> &Counter {
        &self.requests
    }

    pub fn errors(&self) -> &Counter {
        &self.errors
    }

    pub fn duration(&self) -> &Histogram {
        &self.duration
    }
}

/// One in-flight request. Dropping it without `finish` records nothing.
#[derive(Debug)]
pub struct RequestObservation {
    method: String,
    route: String,
    timer: Timer,
    metrics: HttpMetrics,
}

impl RequestObservation {
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Request end: count it, count errors (status >= 400), record latency.
    ///
    /// All three updates are attempted; the first failure is returned.
    pub fn finish(mut self, status: u16) -> Result<()> {
        let code = status.to_string();
        let (method, route) = (self.method.as_str(), self.route.as_str());

        let counted = self.metrics.requests.inc(&[method, route, code.as_str()]);
        let errored = if status >= 400 {
            self.metrics.errors.inc(&[route, code.as_str()])
        } else {
            Ok(())
        };
        let timed = self.timer.stop(&[]).map(|_| ());

        counted.and(errored).and(timed)
    }
}
