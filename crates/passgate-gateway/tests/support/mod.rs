//! Shared test fixtures: a mock authority on an ephemeral port and store
//! doubles.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

pub mod fake_redis;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use passgate_gateway::store::{MemorySetStore, SetStore, StoreError};

/// Passkey that makes the mock answer 500.
pub const SERVER_ERROR: &str = "server-error";
/// Passkey that makes the mock answer after two seconds.
pub const SLOW: &str = "slow";

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub passkey: Option<String>,
    pub api_key: Option<String>,
    pub site: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    valid: Arc<Vec<String>>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct MockAuthority {
    pub url: String,
    state: MockState,
}

impl MockAuthority {
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}

async fn verdict(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let passkey = q.get("passkey").cloned();
    state.seen.lock().unwrap().push(SeenRequest {
        passkey: passkey.clone(),
        api_key: headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        site: q.get("site").cloned(),
    });

    match passkey.as_deref() {
        Some(SERVER_ERROR) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
        }
        Some(SLOW) => tokio::time::sleep(Duration::from_secs(2)).await,
        _ => {}
    }

    let valid = passkey.is_some_and(|p| state.valid.iter().any(|v| *v == p));
    Json(json!({
        "code": 1000,
        "message": "Success",
        "data": { "valid": valid }
    }))
    .into_response()
}

/// Spawn an authority that approves exactly `valid`. The URL carries an
/// existing `site=tracker` query to check it survives.
pub async fn spawn_authority(valid: &[&str]) -> MockAuthority {
    let state = MockState {
        valid: Arc::new(valid.iter().map(|s| s.to_string()).collect()),
        ..Default::default()
    };
    let app = Router::new()
        .route("/api/passkey", get(verdict))
        .with_state(state.clone());

    let addr = serve(app).await;
    MockAuthority {
        url: format!("http://{addr}/api/passkey?site=tracker"),
        state,
    }
}

/// Serve `app` on an ephemeral localhost port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// URL of a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/passkey")
}

/// Memory store that counts lookups.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemorySetStore,
    lookups: AtomicUsize,
}

impl CountingStore {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SetStore for CountingStore {
    fn kind(&self) -> &'static str {
        "counting"
    }

    async fn is_member(&self, set: &str, member: &str) -> Result<bool, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.is_member(set, member).await
    }

    async fn add_with_ttl(&self, set: &str, member: &str, ttl: Duration) -> Result<(), StoreError> {
        self.inner.add_with_ttl(set, member, ttl).await
    }
}

/// Store whose every command fails.
pub struct BrokenStore;

#[async_trait]
impl SetStore for BrokenStore {
    fn kind(&self) -> &'static str {
        "broken"
    }

    async fn is_member(&self, _set: &str, _member: &str) -> Result<bool, StoreError> {
        Err(StoreError::Timeout("SISMEMBER"))
    }

    async fn add_with_ttl(&self, _set: &str, _member: &str, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::Timeout("SADD/EXPIRE"))
    }
}
