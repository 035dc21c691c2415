//! Top-level facade crate for httpmeter.
//!
//! Re-exports the metric primitives and the server library so users can depend on a single crate.

pub mod core {
    pub use httpmeter_core::*;
}

pub mod server {
    pub use httpmeter_server::*;
}
