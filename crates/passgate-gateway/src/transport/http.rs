//! Tracker-facing HTTP handlers.
//!
//! Responsibilities:
//! - Collect named route params and query params into a `TrackerRequest`
//! - Run the hook chain
//! - Map the outcome: approved → 200 with the resolved identity, anything
//!   else → 403 with the failure reason
//!
//! Announce/scrape semantics stay with the tracker; this surface only answers
//! whether the request may proceed.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use passgate_core::{Outcome, Params, RequestContext, TrackerRequest};

use crate::app_state::AppState;
use crate::hooks::RequestKind;

type RouteParams = Option<Path<HashMap<String, String>>>;
type QueryParams = Query<HashMap<String, String>>;

pub async fn announce(State(app): State<AppState>, route: RouteParams, Query(query): QueryParams) -> Response {
    handle(app, RequestKind::Announce, route, query).await
}

pub async fn scrape(State(app): State<AppState>, route: RouteParams, Query(query): QueryParams) -> Response {
    handle(app, RequestKind::Scrape, route, query).await
}

async fn handle(
    app: AppState,
    kind: RequestKind,
    route: RouteParams,
    query: HashMap<String, String>,
) -> Response {
    let route = route.map(|Path(p)| Params::from(p)).unwrap_or_default();
    let req = TrackerRequest::new(route, Params::from(query));

    let (ctx, outcome) = app.chain().run(kind, &req).await;
    decision_response(&ctx, outcome)
}

fn decision_response(ctx: &RequestContext, outcome: Outcome) -> Response {
    match (outcome.reason(), outcome.client_code()) {
        (Some(reason), Some(code)) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "failure reason": reason,
                "code": code.as_str(),
            })),
        )
            .into_response(),
        _ => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "passkey": ctx.resolved_passkey(),
            })),
        )
            .into_response(),
    }
}
