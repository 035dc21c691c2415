//! httpmeter core: in-process metric primitives and the text exposition
//! encoder.
//!
//! This crate carries no HTTP or transport dependencies. The server crate
//! wires these primitives into request middleware and a scrape endpoint.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Contract violations (bad labels, negative observations, duplicate names)
//! surface as `MeterError` so a metrics bug can never take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod metrics;

pub use error::{ErrorCode, MeterError, Result};
pub use metrics::{
    Counter, Histogram, HistogramOpts, HistogramSnapshot, Metric, MetricKind, MetricRegistry,
    Opts, Timer,
};
