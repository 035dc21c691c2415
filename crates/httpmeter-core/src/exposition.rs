//! Prometheus text exposition format (0.0.4).
//!
//! Metrics are written in registration order and series in first-touch
//! order. Labels follow each metric's declared order. A histogram series is
//! copied out under its own lock before any of its lines are written, so its
//! buckets, sum and count always agree; different series may be read at
//! slightly different moments.

use std::fmt::{self, Write};
use std::sync::atomic::Ordering;

use crate::metrics::{Counter, Histogram, LabelNames, LabelSet, Metric, MetricRegistry};

/// Content type of `encode` output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every registered metric.
pub fn encode(registry: &MetricRegistry) -> String {
    let mut out = String::new();
    for metric in registry.metrics() {
        encode_metric(&metric, &mut out);
    }
    out
}

/// Render one metric block: `# HELP`, `# TYPE`, then its samples.
pub fn encode_metric(metric: &Metric, out: &mut String) {
    let _ = writeln!(out, "# HELP {} {}", metric.name(), escape_help(metric.help()));
    let _ = writeln!(out, "# TYPE {} {}", metric.name(), metric.kind().as_str());
    match metric {
        Metric::Counter(c) => encode_counter(c, out),
        Metric::Histogram(h) => encode_histogram(h, out),
    }
}

fn encode_counter(counter: &Counter, out: &mut String) {
    for series in counter.series() {
        let val = series.value().load(Ordering::Relaxed);
        let labels = label_str(series.labels(), counter.label_names());
        let _ = writeln!(out, "{}{} {}", counter.name(), braced(&labels), val);
    }
}

fn encode_histogram(hist: &Histogram, out: &mut String) {
    let name = hist.name();
    for series in hist.series() {
        let snap = hist.read_series(&series);

        let labels = label_str(series.labels(), hist.label_names());
        let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

        let bounds = hist.bounds().iter().map(|b| Float(*b).to_string());
        let les = bounds.chain(std::iter::once("+Inf".to_string()));
        for (le, count) in les.zip(snap.buckets.iter()) {
            let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
        }
        let _ = writeln!(out, "{}_sum{} {}", name, braced(&labels), Float(snap.sum));
        let _ = writeln!(out, "{}_count{} {}", name, braced(&labels), snap.count);
    }
}

fn label_str(labels: &LabelSet, names: &LabelNames) -> String {
    labels
        .pairs(names)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn braced(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", labels)
    }
}

/// Escape a label value: backslash, double quote, newline.
pub fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape HELP text: backslash and newline only.
pub fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Exposition float: `+Inf`, `-Inf`, `NaN`, otherwise shortest decimal.
struct Float(f64);

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            f.write_str("NaN")
        } else if v == f64::INFINITY {
            f.write_str("+Inf")
        } else if v == f64::NEG_INFINITY {
            f.write_str("-Inf")
        } else {
            write!(f, "{}", v)
        }
    }
}
