use std::net::SocketAddr;

use serde::Deserialize;
use httpmeter_core::error::{MeterError, Result};

/// Latency buckets (seconds) for `http_request_duration_seconds`.
pub const HTTP_LATENCY_BUCKETS: [f64; 8] = [0.1, 0.3, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0];

/// Paths owned by built-in handlers; the scrape path may not shadow them.
const RESERVED_PATHS: [&str; 5] = ["/health", "/ready", "/api", "/slow", "/error"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub demo: DemoSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            demo: DemoSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MeterError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            MeterError::InvalidConfig(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_path")]
    pub path: String,

    #[serde(default = "default_latency_buckets")]
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            latency_buckets: default_latency_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') || self.path.contains(&[':', '*', '{', '}'][..]) {
            return Err(MeterError::InvalidConfig(
                "metrics.path must be a literal path starting with '/'".into(),
            ));
        }
        if RESERVED_PATHS.contains(&self.path.as_str()) || self.path.starts_with("/user/") {
            return Err(MeterError::InvalidConfig(format!(
                "metrics.path {} collides with a built-in route",
                self.path
            )));
        }

        let b = &self.latency_buckets;
        if b.is_empty() {
            return Err(MeterError::InvalidConfig(
                "metrics.latency_buckets must not be empty".into(),
            ));
        }
        if b.iter().any(|v| !v.is_finite() || *v <= 0.0) || b.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MeterError::InvalidConfig(
                "metrics.latency_buckets must be positive and strictly ascending".into(),
            ));
        }
        Ok(())
    }
}

/// Knobs for the simulated endpoints.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoSection {
    #[serde(default = "default_slow_min_ms")]
    pub slow_min_ms: u64,

    #[serde(default = "default_slow_jitter_ms")]
    pub slow_jitter_ms: u64,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            slow_min_ms: default_slow_min_ms(),
            slow_jitter_ms: default_slow_jitter_ms(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_latency_buckets() -> Vec<f64> {
    HTTP_LATENCY_BUCKETS.to_vec()
}
fn default_slow_min_ms() -> u64 {
    500
}
fn default_slow_jitter_ms() -> u64 {
    2000
}
