use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{MeterError, Result};

use super::label::{LabelNames, LabelSet};
use super::store::{Series, SeriesStore};
use super::timer::Timer;
use super::{Desc, HistogramOpts};

/// Default bucket bounds in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Point-in-time view of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    /// Cumulative counts, one per bound, plus a trailing `+Inf` bucket.
    pub buckets: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramSnapshot {
    fn zeroed(bounds: usize) -> Self {
        Self {
            buckets: vec![0; bounds + 1],
            sum: 0.0,
            count: 0,
        }
    }
}

/// Cumulative-bucket histogram with fixed upper bounds.
///
/// Bounds are immutable after construction and read without locking. Each
/// series keeps its buckets, sum and count behind one mutex so readers always
/// see the three move together.
#[derive(Debug)]
pub struct Histogram {
    desc: Desc,
    bounds: Arc<[f64]>,
    series: SeriesStore<Mutex<HistogramSnapshot>>,
}

impl Histogram {
    pub(crate) fn new(opts: HistogramOpts) -> Result<Self> {
        let desc = Desc::new(opts.opts, &["le"])?;
        validate_bounds(&desc.name, &opts.buckets)?;

        let histogram = Self {
            desc,
            bounds: opts.buckets.into(),
            series: SeriesStore::new(),
        };
        if histogram.desc.labels.is_empty() {
            histogram.series.get_or_create(LabelSet::empty(), || histogram.empty_state());
        }
        Ok(histogram)
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    pub fn label_names(&self) -> &LabelNames {
        &self.desc.labels
    }

    /// Upper bounds, ascending, without the implicit `+Inf`.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Record `value` (seconds), label values in declared order.
    pub fn observe(&self, values: &[&str], value: f64) -> Result<()> {
        self.check_value(value)?;
        let key = self.desc.labels.resolve_values(&self.desc.name, values)?;
        self.record(key, value);
        Ok(())
    }

    /// Record `value`, labels as `(name, value)` pairs in any order.
    pub fn observe_with(&self, pairs: &[(&str, &str)], value: f64) -> Result<()> {
        self.check_value(value)?;
        let key = self.desc.labels.resolve_pairs(&self.desc.name, pairs)?;
        self.record(key, value);
        Ok(())
    }

    /// Start a timer whose label set may be completed when it stops.
    pub fn start_timer(self: &Arc<Self>, pairs: &[(&str, &str)]) -> Timer {
        Timer::new(Arc::clone(self), pairs)
    }

    /// Consistent view of one series; all zeros if it was never touched.
    pub fn snapshot(&self, values: &[&str]) -> Result<HistogramSnapshot> {
        let key = self.desc.labels.resolve_values(&self.desc.name, values)?;
        Ok(self
            .series
            .get(&key)
            .map(|s| self.read_series(&s))
            .unwrap_or_else(|| HistogramSnapshot::zeroed(self.bounds.len())))
    }

    pub fn cardinality(&self) -> usize {
        self.series.len()
    }

    pub(crate) fn series(&self) -> Vec<Arc<Series<Mutex<HistogramSnapshot>>>> {
        self.series.snapshot()
    }

    /// Copy one series out under its lock.
    pub(crate) fn read_series(&self, series: &Series<Mutex<HistogramSnapshot>>) -> HistogramSnapshot {
        series
            .value()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_value(&self, value: f64) -> Result<()> {
        if value.is_nan() {
            return Err(MeterError::NonFiniteObservation {
                metric: self.desc.name.clone(),
            });
        }
        if value < 0.0 {
            return Err(MeterError::NegativeObservation {
                metric: self.desc.name.clone(),
                value,
            });
        }
        Ok(())
    }

    fn record(&self, key: LabelSet, value: f64) {
        // first bound >= value; everything from there up, +Inf included
        let first = self.bounds.partition_point(|b| *b < value);

        let series = self.series.get_or_create(key, || self.empty_state());
        let mut state = series.value().lock().unwrap_or_else(PoisonError::into_inner);
        for bucket in state.buckets.iter_mut().skip(first) {
            *bucket += 1;
        }
        state.sum += value;
        state.count += 1;
    }

    fn empty_state(&self) -> Mutex<HistogramSnapshot> {
        Mutex::new(HistogramSnapshot::zeroed(self.bounds.len()))
    }
}

fn validate_bounds(metric: &str, bounds: &[f64]) -> Result<()> {
    let invalid = |reason: &str| MeterError::InvalidBuckets {
        metric: metric.to_string(),
        reason: reason.to_string(),
    };

    if bounds.is_empty() {
        return Err(invalid("at least one bucket bound is required"));
    }
    if bounds.iter().any(|b| !b.is_finite() || *b <= 0.0) {
        return Err(invalid("bounds must be finite and positive"));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(invalid("bounds must be strictly ascending"));
    }
    Ok(())
}
