use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Result;

use super::label::{LabelNames, LabelSet};
use super::store::{Series, SeriesStore};
use super::{Desc, Opts};

/// Monotonic counter with a fixed set of label names.
///
/// Series are created at zero on first increment. The delta is unsigned, so
/// a series can never decrease.
#[derive(Debug)]
pub struct Counter {
    desc: Desc,
    series: SeriesStore<AtomicU64>,
}

impl Counter {
    pub(crate) fn new(opts: Opts) -> Result<Self> {
        let counter = Self {
            desc: Desc::new(opts, &[])?,
            series: SeriesStore::new(),
        };
        if counter.desc.labels.is_empty() {
            counter.series.get_or_create(LabelSet::empty(), AtomicU64::default);
        }
        Ok(counter)
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

    /// Increment by 1, label values in declared order.
    pub fn inc(&self, values: &[&str]) -> Result<()> {
        self.inc_by(values, 1)
    }

    /// Increment by `delta`, label values in declared order.
    pub fn inc_by(&self, values: &[&str], delta: u64) -> Result<()> {
        let key = self.desc.labels.resolve_values(&self.desc.name, values)?;
        self.add(key, delta);
        Ok(())
    }

    /// Increment by 1, labels as `(name, value)` pairs in any order.
    pub fn inc_with(&self, pairs: &[(&str, &str)]) -> Result<()> {
        self.inc_by_with(pairs, 1)
    }

    pub fn inc_by_with(&self, pairs: &[(&str, &str)], delta: u64) -> Result<()> {
        let key = self.desc.labels.resolve_pairs(&self.desc.name, pairs)?;
        self.add(key, delta);
        Ok(())
    }

    /// Current value of one series; zero if it was never touched.
    pub fn value(&self, values: &[&str]) -> Result<u64> {
        let key = self.desc.labels.resolve_values(&self.desc.name, values)?;
        Ok(self
            .series
            .get(&key)
            .map(|s| s.value().load(Ordering::Relaxed))
            .unwrap_or(0))
    }

    /// Number of distinct label sets seen so far.
    pub fn cardinality(&self) -> usize {
        self.series.len()
    }

    pub(crate) fn series(&self) -> Vec<Arc<Series<AtomicU64>>> {
        self.series.snapshot()
    }

    fn add(&self, key: LabelSet, delta: u64) {
        let series = self.series.get_or_create(key, AtomicU64::default);
        series.value().fetch_add(delta, Ordering::Relaxed);
    }
}
