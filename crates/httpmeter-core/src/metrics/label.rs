//! Label names and label sets.
//!
//! A metric declares its label names once, in order. Every series of that
//! metric is keyed by a `LabelSet` holding exactly one value per declared
//! name, stored in declared order. Callers may supply values positionally or
//! as `(name, value)` pairs in any order; both resolve to the same key, so
//! equality and hashing never depend on the order pairs were passed in.

use std::sync::Arc;

use crate::error::{MeterError, Result};

/// Validated, ordered label names declared by one metric.
#[derive(Debug, Clone)]
pub struct LabelNames {
    names: Arc<[String]>,
}

impl LabelNames {
    /// Validate declared names. `reserved` lists names the metric kind claims
    /// for itself (histograms reserve `le`).
    pub(crate) fn new(metric: &str, names: &[String], reserved: &[&str]) -> Result<Self> {
        for (i, name) in names.iter().enumerate() {
            if !is_valid_label_name(name) || reserved.contains(&name.as_str()) {
                return Err(MeterError::InvalidLabelName {
                    metric: metric.to_string(),
                    label: name.clone(),
                });
            }
            if names[..i].contains(name) {
                return Err(MeterError::DuplicateLabelName {
                    metric: metric.to_string(),
                    label: name.clone(),
                });
            }
        }
        Ok(Self {
            names: names.iter().cloned().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Resolve positional values (declared order).
    pub(crate) fn resolve_values(&self, metric: &str, values: &[&str]) -> Result<LabelSet> {
        if values.len() != self.names.len() {
            return Err(MeterError::LabelArityMismatch {
                metric: metric.to_string(),
                expected: self.names.len(),
                got: values.len(),
            });
        }
        Ok(LabelSet {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    /// Resolve `(name, value)` pairs supplied in any order.
    pub(crate) fn resolve_pairs(&self, metric: &str, pairs: &[(&str, &str)]) -> Result<LabelSet> {
        let mut slots: Vec<Option<&str>> = vec![None; self.names.len()];

        for &(name, value) in pairs {
            let slot = self
                .names
                .iter()
                .position(|n| n == name)
                .and_then(|idx| slots.get_mut(idx))
                .ok_or_else(|| MeterError::UnknownLabelName {
                    metric: metric.to_string(),
                    label: name.to_string(),
                })?;
            if slot.replace(value).is_some() {
                return Err(MeterError::DuplicateLabelName {
                    metric: metric.to_string(),
                    label: name.to_string(),
                });
            }
        }

        let values = slots
            .into_iter()
            .map(|s| s.map(str::to_string))
            .collect::<Option<Box<[String]>>>()
            .ok_or_else(|| MeterError::LabelArityMismatch {
                metric: metric.to_string(),
                expected: self.names.len(),
                got: pairs.len(),
            })?;

        Ok(LabelSet { values })
    }
}

/// Label values identifying one series, in the owning metric's declared order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelSet {
    values: Box<[String]>,
}

impl LabelSet {
    /// The key of the single series of a label-less metric.
    pub fn empty() -> Self {
        Self {
            values: Box::default(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Pair each value with its declared name.
    pub fn pairs<'a>(&'a self, names: &'a LabelNames) -> impl Iterator<Item = (&'a str, &'a str)> {
        names
            .as_slice()
            .iter()
            .zip(self.values.iter())
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, minus the `__` prefix kept for internal use.
pub fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
