//! httpmeter server library entry.
//!
//! This crate wires the metric registry, request instrumentation, the scrape
//! endpoint and the demo routes into an axum service. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod demo;
pub mod obs;
pub mod ops;
pub mod router;
