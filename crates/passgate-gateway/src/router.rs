//! Axum router wiring.
//!
//! The credential path segment is named by `gateway.route_param`, so legacy
//! `/:passkey/announce` deployments keep working unchanged.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let param = state.cfg().gateway.route_param.as_str();

    Router::new()
        .route("/announce", get(transport::http::announce))
        .route(&format!("/:{param}/announce"), get(transport::http::announce))
        .route("/scrape", get(transport::http::scrape))
        .route(&format!("/:{param}/scrape"), get(transport::http::scrape))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
