//! In-process metric primitives.
//!
//! Counters and histograms keyed by label sets, a registry that owns them,
//! and a two-phase timer feeding histograms. The registry is an ordinary
//! value: construct it once at startup and share it by `Arc`.

mod counter;
mod histogram;
mod label;
mod registry;
mod store;
mod timer;

pub use counter::Counter;
pub use histogram::{Histogram, HistogramSnapshot, DEFAULT_BUCKETS};
pub use label::{is_valid_label_name, is_valid_metric_name, LabelNames, LabelSet};
pub use registry::{Metric, MetricKind, MetricRegistry};
pub use store::{Series, SeriesStore};
pub use timer::Timer;

use crate::error::{MeterError, Result};

/// Options shared by every metric kind.
#[derive(Debug, Clone)]
pub struct Opts {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl Opts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_names: Vec::new(),
        }
    }

    pub fn label_names(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }
}

/// Histogram options: common options plus bucket upper bounds.
#[derive(Debug, Clone)]
pub struct HistogramOpts {
    pub opts: Opts,
    pub buckets: Vec<f64>,
}

impl HistogramOpts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            opts: Opts::new(name, help),
            buckets: DEFAULT_BUCKETS.to_vec(),
        }
    }

    pub fn label_names(mut self, names: &[&str]) -> Self {
        self.opts = self.opts.label_names(names);
        self
    }

    pub fn buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = buckets;
        self
    }
}

/// Immutable identity of a registered metric.
#[derive(Debug, Clone)]
pub(crate) struct Desc {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) labels: LabelNames,
}

impl Desc {
    pub(crate) fn new(opts: Opts, reserved: &[&str]) -> Result<Self> {
        if !is_valid_metric_name(&opts.name) {
            return Err(MeterError::InvalidMetricName(opts.name));
        }
        let labels = LabelNames::new(&opts.name, &opts.label_names, reserved)?;
        Ok(Self {
            name: opts.name,
            help: opts.help,
            labels,
        })
    }
}
