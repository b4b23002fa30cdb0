//! Top-level facade crate for passgate.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use passgate_core::*;
}

pub mod gateway {
    pub use passgate_gateway::*;
}
