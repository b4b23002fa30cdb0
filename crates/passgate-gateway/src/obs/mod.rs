//! Lightweight in-process metrics (dependency-free).
//!
//! Infrastructure failures never reach tracker clients as distinct errors, so
//! these counters are the only place cache and authority outages show up
//! besides the logs. Rendered by the `/metrics` handler.

pub mod metrics;

pub use metrics::GatewayMetrics;
