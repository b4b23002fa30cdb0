//! passgate core: transport-agnostic authorization primitives.
//!
//! This crate defines the request/context types handed to hooks, the
//! credential extractor and envelope cipher, and the error surface shared by
//! the gateway. It carries no runtime or network dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Hostile credentials must surface as `PassgateError`, never as a crash on
//! the announce path.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod credential;
pub mod error;
pub mod outcome;
pub mod request;

/// Re-exports of the types most callers need.
pub use error::{ClientCode, PassgateError, Result};
pub use outcome::Outcome;
pub use request::{Params, RequestContext, TrackerRequest};
