//! Shared error type across httpmeter crates.

use thiserror::Error;

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A metric with the same name is already registered.
    DuplicateMetricName,
    /// Wrong number of label values for a metric.
    LabelArityMismatch,
    /// Label name not declared by the metric.
    UnknownLabelName,
    /// Label name supplied or declared twice.
    DuplicateLabelName,
    /// Histogram observation below zero.
    NegativeObservation,
    /// Histogram observation is NaN.
    NonFiniteObservation,
    /// Timer stopped more than once.
    TimerAlreadyStopped,
    /// Metric name outside the exposition charset.
    InvalidMetricName,
    /// Label name outside the exposition charset or reserved.
    InvalidLabelName,
    /// Histogram bucket bounds are unusable.
    InvalidBuckets,
    /// Configuration rejected at load time.
    InvalidConfig,
}

impl ErrorCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateMetricName => "DUPLICATE_METRIC_NAME",
            ErrorCode::LabelArityMismatch => "LABEL_ARITY_MISMATCH",
            ErrorCode::UnknownLabelName => "UNKNOWN_LABEL_NAME",
            ErrorCode::DuplicateLabelName => "DUPLICATE_LABEL_NAME",
            ErrorCode::NegativeObservation => "NEGATIVE_OBSERVATION",
            ErrorCode::NonFiniteObservation => "NON_FINITE_OBSERVATION",
            ErrorCode::TimerAlreadyStopped => "TIMER_ALREADY_STOPPED",
            ErrorCode::InvalidMetricName => "INVALID_METRIC_NAME",
            ErrorCode::InvalidLabelName => "INVALID_LABEL_NAME",
            ErrorCode::InvalidBuckets => "INVALID_BUCKETS",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MeterError>;

/// Unified error type used by core and server.
///
/// Every variant except `InvalidConfig` is a programming-contract violation:
/// nothing here is transient, so nothing is retried.
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("metric already registered: {0}")]
    DuplicateMetricName(String),
    #[error("metric {metric}: expected {expected} label values, got {got}")]
    LabelArityMismatch {
        metric: String,
        expected: usize,
        got: usize,
    },
    #[error("metric {metric}: unknown label name {label}")]
    UnknownLabelName { metric: String, label: String },
    #[error("metric {metric}: duplicate label name {label}")]
    DuplicateLabelName { metric: String, label: String },
    #[error("metric {metric}: negative observation {value}")]
    NegativeObservation { metric: String, value: f64 },
    #[error("metric {metric}: observation is not a number")]
    NonFiniteObservation { metric: String },
    #[error("metric {metric}: timer already stopped")]
    TimerAlreadyStopped { metric: String },
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    #[error("metric {metric}: invalid label name {label:?}")]
    InvalidLabelName { metric: String, label: String },
    #[error("metric {metric}: invalid buckets: {reason}")]
    InvalidBuckets { metric: String, reason: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl MeterError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeterError::DuplicateMetricName(_) => ErrorCode::DuplicateMetricName,
            MeterError::LabelArityMismatch { .. } => ErrorCode::LabelArityMismatch,
            MeterError::UnknownLabelName { .. } => ErrorCode::UnknownLabelName,
            MeterError::DuplicateLabelName { .. } => ErrorCode::DuplicateLabelName,
            MeterError::NegativeObservation { .. } => ErrorCode::NegativeObservation,
            MeterError::NonFiniteObservation { .. } => ErrorCode::NonFiniteObservation,
            MeterError::TimerAlreadyStopped { .. } => ErrorCode::TimerAlreadyStopped,
            MeterError::InvalidMetricName(_) => ErrorCode::InvalidMetricName,
            MeterError::InvalidLabelName { .. } => ErrorCode::InvalidLabelName,
            MeterError::InvalidBuckets { .. } => ErrorCode::InvalidBuckets,
            MeterError::InvalidConfig(_) => ErrorCode::InvalidConfig,
        }
    }
}
