//! Client for the external passkey authority.
//!
//! Protocol: `GET <http_url>?…&passkey=<value>` with an optional static API
//! key header. The body is `{"code": int, "message": string, "data": {"valid":
//! bool}}`; only the status class and `data.valid` decide anything, `code`
//! and `message` are logged.
//!
//! One attempt per request, bounded by the client timeout. Every transport
//! failure collapses into `Verdict::Unavailable`.

use std::time::{Duration, Instant};

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;
use serde::Deserialize;

use passgate_core::error::{PassgateError, Result};

use crate::obs::metrics::GatewayMetrics;

/// Response body of the authority.
#[derive(Debug, Default, Deserialize)]
pub struct VerificationVerdict {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: VerdictData,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerdictData {
    #[serde(default)]
    pub valid: bool,
}

/// Interpreted authority answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 2xx and `data.valid == true`.
    Valid,
    /// 2xx with anything else in the body.
    Invalid,
    /// No verdict obtained (network, timeout, non-2xx).
    Unavailable,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Valid => "valid",
            Verdict::Invalid => "invalid",
            Verdict::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthorityClient {
    http: reqwest::Client,
    url: Url,
    api_key: Option<(HeaderName, HeaderValue)>,
}

impl AuthorityClient {
    pub fn new(
        url: &str,
        timeout: Duration,
        api_key_header: &str,
        api_key: Option<&str>,
    ) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| PassgateError::BadRequest(format!("authority url invalid: {e}")))?;

        let api_key = match api_key {
            Some(key) => {
                let name = HeaderName::from_bytes(api_key_header.as_bytes()).map_err(|e| {
                    PassgateError::BadRequest(format!("authority api key header invalid: {e}"))
                })?;
                let mut value = HeaderValue::from_str(key).map_err(|e| {
                    PassgateError::BadRequest(format!("authority api key invalid: {e}"))
                })?;
                value.set_sensitive(true);
                Some((name, value))
            }
            None => None,
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PassgateError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self { http, url, api_key })
    }

    /// Endpoint with `passkey` appended, keeping any existing query.
    pub fn request_url(&self, passkey: &str) -> Url {
        let mut u = self.url.clone();
        u.query_pairs_mut().append_pair("passkey", passkey);
        u
    }

    pub async fn verify(&self, passkey: &str, metrics: &GatewayMetrics) -> Verdict {
        let started = Instant::now();
        let verdict = self.query(passkey).await;
        metrics
            .authority_duration
            .observe(&[("verdict", verdict.as_str())], started.elapsed());
        metrics
            .authority_requests
            .inc(&[("verdict", verdict.as_str())]);
        verdict
    }

    async fn query(&self, passkey: &str) -> Verdict {
        let url = self.request_url(passkey);
        tracing::debug!(endpoint = %self.url, "checking passkey with authority");

        let mut req = self.http.get(url);
        if let Some((name, value)) = &self.api_key {
            req = req.header(name.clone(), value.clone());
        }

        let resp = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, timeout = e.is_timeout(), endpoint = %self.url, "authority request failed");
                return Verdict::Unavailable;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint = %self.url, "authority returned non-2xx status");
            return Verdict::Unavailable;
        }

        let body = match resp.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, endpoint = %self.url, "authority body read failed");
                return Verdict::Unavailable;
            }
        };

        // A 2xx body that does not parse counts as "not valid".
        let verdict: VerificationVerdict = serde_json::from_slice(&body).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "authority body is not a verdict");
            VerificationVerdict::default()
        });

        tracing::info!(
            status = status.as_u16(),
            code = verdict.code,
            message = %verdict.message,
            valid = verdict.data.valid,
            "authority validation result"
        );

        if verdict.data.valid {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }
}
