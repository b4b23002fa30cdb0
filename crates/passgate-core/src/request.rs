//! Per-request types handed to hooks by the host.
//!
//! The host owns parsing; hooks only see two flat parameter maps (named route
//! segments and query parameters) plus a mutable `RequestContext` that lives
//! for the duration of one request's hook chain.

use std::collections::HashMap;

use crate::credential::DecryptedPayload;

/// Flat string parameters (route segments or query pairs).
#[derive(Debug, Clone, Default)]
pub struct Params {
    inner: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<HashMap<String, String>> for Params {
    fn from(inner: HashMap<String, String>) -> Self {
        Self { inner }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Inbound tracker request as seen by the authorization hooks.
#[derive(Debug, Clone, Default)]
pub struct TrackerRequest {
    /// Transport-level named route parameters (e.g. `/:credential/announce`).
    pub route: Params,
    /// Protocol-level query parameters.
    pub query: Params,
}

impl TrackerRequest {
    pub fn new(route: Params, query: Params) -> Self {
        Self { route, query }
    }
}

/// State carried through one request's hook chain.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Decrypted credential, set as soon as decryption succeeds regardless of
    /// the final outcome.
    pub payload: Option<DecryptedPayload>,
    /// Passkey resolved by the approval hook (either mode).
    pub passkey: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passkey for downstream stages: the decrypted one first, then the
    /// plaintext one.
    pub fn resolved_passkey(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .map(|p| p.passkey.as_str())
            .or(self.passkey.as_deref())
    }
}
