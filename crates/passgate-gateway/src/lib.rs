//! passgate gateway library entry.
//!
//! This crate wires the config loader, cache stores, authority client and
//! authorization hooks into an HTTP service a tracker can consult per
//! request. It is consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod authority;
pub mod config;
pub mod hooks;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
pub mod transport;
