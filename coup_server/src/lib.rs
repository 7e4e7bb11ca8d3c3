//! Library surface for the Coup room server, split out from `main.rs`
//! so integration tests can drive the real router with `tower::ServiceExt`
//! instead of spinning up a TCP listener.

pub mod api;
pub mod config;
pub mod metrics;
