//! Two-phase latency timer.
//!
//! `Histogram::start_timer` captures a monotonic instant and whatever labels
//! are known up front. `Timer::stop` supplies the rest (a response status,
//! say), computes the elapsed time and records it once. Labels given at stop
//! override start labels of the same name.

use std::sync::Arc;

use tokio::time::Instant;

use crate::error::{MeterError, Result};

use super::histogram::Histogram;

#[derive(Debug)]
pub struct Timer {
    histogram: Arc<Histogram>,
    start: Instant,
    labels: Vec<(String, String)>,
    stopped: bool,
}

impl Timer {
    pub(crate) fn new(histogram: Arc<Histogram>, pairs: &[(&str, &str)]) -> Self {
        Self {
            histogram,
            start: Instant::now(),
            labels: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Record the elapsed seconds and return them.
    ///
    /// The timer is spent by the first call even if recording fails on a
    /// label error; any later call returns `TimerAlreadyStopped`.
    pub fn stop(&mut self, pairs: &[(&str, &str)]) -> Result<f64> {
        if self.stopped {
            return Err(MeterError::TimerAlreadyStopped {
                metric: self.histogram.name().to_string(),
            });
        }
        self.stopped = true;

        let secs = self.start.elapsed().as_secs_f64();

        let mut merged = std::mem::take(&mut self.labels);
        for (k, v) in pairs {
            match merged.iter_mut().find(|(name, _)| name == k) {
                Some(existing) => existing.1 = v.to_string(),
                None => merged.push((k.to_string(), v.to_string())),
            }
        }
        let refs: Vec<(&str, &str)> = merged
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        self.histogram.observe_with(&refs, secs)?;
        Ok(secs)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.stopped {
            tracing::debug!(metric = %self.histogram.name(), "timer dropped without stop, nothing recorded");
        }
    }
}
