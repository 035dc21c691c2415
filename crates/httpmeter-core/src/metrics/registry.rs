use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{MeterError, Result};

use super::counter::Counter;
use super::histogram::Histogram;
use super::{HistogramOpts, Opts};

/// Metric kind as written in `# TYPE` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Handle to a registered metric.
#[derive(Debug, Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Histogram(Arc<Histogram>),
}

impl Metric {
    pub fn name(&self) -> &str {
        match self {
            Metric::Counter(c) => c.name(),
            Metric::Histogram(h) => h.name(),
        }
    }

    pub fn help(&self) -> &str {
        match self {
            Metric::Counter(c) => c.help(),
            Metric::Histogram(h) => h.help(),
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Histogram(_) => MetricKind::Histogram,
        }
    }
}

/// Owns every metric of the process, in registration order.
///
/// Construct once at startup and hand out `Arc<MetricRegistry>`; there is no
/// global instance.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: RwLock<Vec<Metric>>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_counter(&self, opts: Opts) -> Result<Arc<Counter>> {
        let counter = Arc::new(Counter::new(opts)?);
        self.register(Metric::Counter(Arc::clone(&counter)))?;
        Ok(counter)
    }

    pub fn register_histogram(&self, opts: HistogramOpts) -> Result<Arc<Histogram>> {
        let histogram = Arc::new(Histogram::new(opts)?);
        self.register(Metric::Histogram(Arc::clone(&histogram)))?;
        Ok(histogram)
    }

    /// Add a metric. Fails without side effects if the name is taken.
    pub fn register(&self, metric: Metric) -> Result<()> {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        if metrics.iter().any(|m| m.name() == metric.name()) {
            return Err(MeterError::DuplicateMetricName(metric.name().to_string()));
        }
        tracing::debug!(name = %metric.name(), kind = metric.kind().as_str(), "metric registered");
        metrics.push(metric);
        Ok(())
    }

    /// All metrics in registration order.
    pub fn metrics(&self) -> Vec<Metric> {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.metrics.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
