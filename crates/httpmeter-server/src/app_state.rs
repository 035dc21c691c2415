//! Shared application state for the httpmeter server.
//!
//! The metric registry is created here, once, and injected into the
//! middleware and the scrape handler through this state. Nothing reaches it
//! through a global.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use httpmeter_core::error::Result;
use httpmeter_core::MetricRegistry;

use crate::config::AppConfig;
use crate::obs::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    registry: Arc<MetricRegistry>,
    http: HttpMetrics,
    draining: AtomicBool,
}

impl AppState {
    /// Build state around a fresh registry.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        Self::with_registry(cfg, Arc::new(MetricRegistry::new()))
    }

    /// Build state around a caller-supplied registry. Registering the HTTP
    /// metrics fails if the registry already holds one of their names.
    pub fn with_registry(cfg: AppConfig, registry: Arc<MetricRegistry>) -> Result<Self> {
        let http = HttpMetrics::register(&registry, cfg.metrics.latency_buckets.clone())?;

        tracing::debug!(metrics = registry.len(), "http metrics registered");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                http,
                draining: AtomicBool::new(false),
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.inner.registry
    }

    pub fn http_metrics(&self) -> &HttpMetrics {
        &self.inner.http
    }

    /// Mark draining state (readiness turns 503).
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
