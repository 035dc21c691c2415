//! Per-metric series storage.
//!
//! Series are looked up through a sharded `DashMap` keyed by `LabelSet`, so
//! updates to different label sets only contend when they hash to the same
//! shard, and only for the duration of the lookup. The accumulator itself is
//! reached through an `Arc` and mutated outside the shard lock.
//!
//! A second, append-only list keeps series in first-touch order. Export walks
//! that list, which gives a stable order across scrapes without sorting.
//!
//! Lock order is always map shard -> `order`. Export only ever takes `order`.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::label::LabelSet;

/// One labelled series and its accumulator.
#[derive(Debug)]
pub struct Series<A> {
    labels: LabelSet,
    value: A,
}

impl<A> Series<A> {
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn value(&self) -> &A {
        &self.value
    }
}

#[derive(Debug)]
pub struct SeriesStore<A> {
    index: DashMap<LabelSet, Arc<Series<A>>>,
    order: RwLock<Vec<Arc<Series<A>>>>,
}

impl<A> Default for SeriesStore<A> {
    fn default() -> Self {
        Self {
            index: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }
}

impl<A> SeriesStore<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the series for `labels`, creating it with `init` on first touch.
    ///
    /// Creation happens under the shard's entry lock, so two racing callers
    /// for the same key always end up sharing one accumulator.
    pub fn get_or_create(&self, labels: LabelSet, init: impl FnOnce() -> A) -> Arc<Series<A>> {
        if let Some(found) = self.index.get(&labels) {
            return Arc::clone(found.value());
        }

        match self.index.entry(labels) {
            Entry::Occupied(e) => Arc::clone(e.get()),
            Entry::Vacant(e) => {
                let series = Arc::new(Series {
                    labels: e.key().clone(),
                    value: init(),
                });
                self.order
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(Arc::clone(&series));
                e.insert(Arc::clone(&series));
                series
            }
        }
    }

    /// Look up an existing series without creating it.
    pub fn get(&self, labels: &LabelSet) -> Option<Arc<Series<A>>> {
        self.index.get(labels).map(|r| Arc::clone(r.value()))
    }

    /// All series in first-touch order.
    pub fn snapshot(&self) -> Vec<Arc<Series<A>>> {
        self.order
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of distinct series (the metric's cardinality).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
