//! Passkey approval hook.
//!
//! Decision order for an announce:
//! 1. extract the credential (`credential` before legacy `passkey`)
//!    → `MissingCredential` when absent
//! 2. open it when an encryption key is configured
//!    → `MalformedCredential` on any decode failure; the payload is attached
//!    to the context as soon as it opens, whatever happens next
//! 3. cache set membership → `Approved` on hit
//! 4. authority verdict → `Approved` when valid, written back to the cache
//! 5. otherwise `Unapproved`
//!
//! Cache and authority failures never reject by themselves; they only fail
//! to approve.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use passgate_core::credential::{extract_credential, CredentialCipher};
use passgate_core::error::Result;
use passgate_core::{Outcome, RequestContext, TrackerRequest};

use crate::authority::{AuthorityClient, Verdict};
use crate::config::{PasskeyApprovalConfig, UnverifiedPolicy};
use crate::hooks::Hook;
use crate::obs::GatewayMetrics;
use crate::store::{self, SetStore};

pub const NAME: &str = "passkey_approval";

pub struct PasskeyApproval {
    set_key: String,
    cache_ttl: Option<Duration>,
    unverified: UnverifiedPolicy,
    cipher: Option<CredentialCipher>,
    store: Option<Arc<dyn SetStore>>,
    authority: Option<AuthorityClient>,
    metrics: Arc<GatewayMetrics>,
}

impl PasskeyApproval {
    pub fn from_config(cfg: PasskeyApprovalConfig, metrics: Arc<GatewayMetrics>) -> Result<Self> {
        cfg.validate()?;

        let cipher = cfg
            .encryption_key()
            .map(|k| CredentialCipher::new(k.as_bytes()))
            .transpose()?;

        let store = cfg
            .redis_broker()
            .map(|target| store::open_store(target, cfg.store_timeouts()))
            .transpose()?;

        let authority = cfg
            .http_url()
            .map(|url| {
                AuthorityClient::new(
                    url,
                    cfg.http_timeout(),
                    &cfg.http_api_key_header,
                    cfg.http_api_key(),
                )
            })
            .transpose()?;

        tracing::info!(
            hook = NAME,
            store = store.as_ref().map_or("none", |s| s.kind()),
            set_key = %cfg.set_key,
            http_url = cfg.http_url().unwrap_or(""),
            http_timeout_ms = cfg.http_timeout_ms,
            http_api_key_header = %cfg.http_api_key_header,
            http_api_key = cfg.http_api_key().is_some(),
            cache_ttl_seconds = cfg.cache_ttl_seconds,
            encryption_key = cipher.is_some(),
            unverified = ?cfg.unverified,
            "passkey approval hook enabled"
        );

        Ok(Self {
            set_key: cfg.set_key.clone(),
            cache_ttl: cfg.cache_ttl(),
            unverified: cfg.unverified,
            cipher,
            store,
            authority,
            metrics,
        })
    }

    /// Replace the cache store (e.g. to share one store between hooks).
    pub fn with_store(mut self, store: Arc<dyn SetStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn encryption_enabled(&self) -> bool {
        self.cipher.is_some()
    }

    /// Full decision for one request; see the module docs for the order.
    pub async fn authorize(&self, req: &TrackerRequest, ctx: &mut RequestContext) -> Outcome {
        let Some(credential) = extract_credential(req) else {
            return Outcome::MissingCredential;
        };

        let passkey = match &self.cipher {
            Some(cipher) => match cipher.open(credential) {
                Ok(payload) => {
                    let passkey = payload.passkey.clone();
                    ctx.payload = Some(payload);
                    passkey
                }
                Err(e) => {
                    tracing::error!(error = ?e, credential = %redact(credential), "failed to decrypt credential");
                    return Outcome::MalformedCredential;
                }
            },
            None => credential.to_string(),
        };
        ctx.passkey = Some(passkey.clone());

        if self.cache_hit(&passkey).await {
            return Outcome::Approved;
        }

        if let Some(authority) = &self.authority {
            if authority.verify(&passkey, &self.metrics).await == Verdict::Valid {
                self.write_back(&passkey).await;
                return Outcome::Approved;
            }
            return Outcome::Unapproved;
        }

        if self.store.is_none() && self.unverified == UnverifiedPolicy::Approve {
            tracing::debug!(passkey = %redact(&passkey), "no validator configured, approving unverified passkey");
            return Outcome::Approved;
        }

        Outcome::Unapproved
    }

    async fn cache_hit(&self, passkey: &str) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        let (hit, result) = match store.is_member(&self.set_key, passkey).await {
            Ok(true) => (true, "hit"),
            Ok(false) => (false, "miss"),
            Err(e) => {
                tracing::error!(error = %e, key = %self.set_key, "failed to check passkey in cache");
                (false, "error")
            }
        };
        self.metrics
            .cache_lookups
            .inc(&[("store", store.kind()), ("result", result)]);
        tracing::info!(key = %self.set_key, passkey = %redact(passkey), result, "passkey cache lookup");
        hit
    }

    async fn write_back(&self, passkey: &str) {
        let (Some(store), Some(ttl)) = (&self.store, self.cache_ttl) else {
            return;
        };

        let result = match store.add_with_ttl(&self.set_key, passkey, ttl).await {
            Ok(()) => "ok",
            Err(e) => {
                tracing::warn!(error = %e, key = %self.set_key, "failed to cache approved passkey");
                "error"
            }
        };
        self.metrics
            .cache_writes
            .inc(&[("store", store.kind()), ("result", result)]);
    }
}

#[async_trait]
impl Hook for PasskeyApproval {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn handle_announce(&self, req: &TrackerRequest, ctx: &mut RequestContext) -> Outcome {
        self.authorize(req, ctx).await
    }
}

/// Keep logs useful for correlation without leaking whole credentials.
fn redact(s: &str) -> String {
    let head: String = s.chars().take(6).collect();
    if head.len() == s.len() {
        "*".repeat(s.chars().count().max(1))
    } else {
        format!("{head}…({} chars)", s.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_hides_short_values_entirely() {
        assert_eq!(redact("abc"), "***");
        assert_eq!(redact("abcdefghij"), "abcdef…(10 chars)");
    }
}
