//! Transport layer (HTTP).
//!
//! Exposes the announce/scrape handlers that turn axum extractors into a
//! `TrackerRequest` before the hook chain sees it.

pub mod http;
