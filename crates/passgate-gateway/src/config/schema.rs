use std::net::SocketAddr;
use std::time::Duration;

use reqwest::header::HeaderName;
use reqwest::Url;
use serde::Deserialize;

use passgate_core::credential::KEY_LEN;
use passgate_core::error::{PassgateError, Result};

use crate::store;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassgateConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub hooks: Vec<HookConfig>,
}

impl PassgateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PassgateError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        if self.hooks.is_empty() {
            return Err(PassgateError::BadRequest("hooks must not be empty".into()));
        }

        self.gateway.validate()?;
        for hook in &self.hooks {
            hook.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Name of the path segment in `/:<name>/announce`.
    #[serde(default)]
    pub route_param: RouteParam,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route_param: RouteParam::default(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen.parse::<SocketAddr>().map_err(|e| {
            PassgateError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })?;
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:6969".into()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteParam {
    #[default]
    Credential,
    Passkey,
}

impl RouteParam {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteParam::Credential => "credential",
            RouteParam::Passkey => "passkey",
        }
    }
}

/// One entry of the hook chain, selected by its `name` tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", content = "options", rename_all = "snake_case", deny_unknown_fields)]
pub enum HookConfig {
    PasskeyApproval(PasskeyApprovalConfig),
}

impl HookConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            HookConfig::PasskeyApproval(c) => c.validate(),
        }
    }
}

/// What to decide when neither a cache store nor an authority is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnverifiedPolicy {
    #[default]
    Reject,
    Approve,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasskeyApprovalConfig {
    /// `redis://[pwd@]host[:port][/db]` or `memory://`.
    #[serde(default)]
    pub redis_broker: Option<String>,

    #[serde(default = "default_set_key")]
    pub set_key: String,

    #[serde(default)]
    pub http_url: Option<String>,

    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    #[serde(default = "default_http_api_key_header")]
    pub http_api_key_header: String,

    #[serde(default)]
    pub http_api_key: Option<String>,

    /// 0 disables write-back after a positive authority verdict.
    #[serde(default)]
    pub cache_ttl_seconds: u64,

    // 0 selects store::DEFAULT_STORE_TIMEOUT
    #[serde(default)]
    pub redis_read_timeout_ms: u64,
    #[serde(default)]
    pub redis_write_timeout_ms: u64,
    #[serde(default)]
    pub redis_connect_timeout_ms: u64,

    /// Exactly 32 bytes. Absent or empty selects plaintext mode.
    #[serde(default)]
    pub encryption_key: Option<String>,

    #[serde(default)]
    pub unverified: UnverifiedPolicy,
}

impl Default for PasskeyApprovalConfig {
    fn default() -> Self {
        Self {
            redis_broker: None,
            set_key: default_set_key(),
            http_url: None,
            http_timeout_ms: default_http_timeout_ms(),
            http_api_key_header: default_http_api_key_header(),
            http_api_key: None,
            cache_ttl_seconds: 0,
            redis_read_timeout_ms: 0,
            redis_write_timeout_ms: 0,
            redis_connect_timeout_ms: 0,
            encryption_key: None,
            unverified: UnverifiedPolicy::default(),
        }
    }
}

impl PasskeyApprovalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.set_key.is_empty() {
            return Err(PassgateError::BadRequest(
                "passkey_approval.set_key must not be empty".into(),
            ));
        }
        if !(1..=60_000).contains(&self.http_timeout_ms) {
            return Err(PassgateError::BadRequest(
                "passkey_approval.http_timeout_ms must be between 1 and 60000".into(),
            ));
        }
        if let Some(key) = self.encryption_key() {
            if key.len() != KEY_LEN {
                return Err(PassgateError::BadRequest(format!(
                    "passkey_approval.encryption_key must be {KEY_LEN} bytes"
                )));
            }
        }
        if let Some(url) = self.http_url() {
            let parsed = Url::parse(url).map_err(|e| {
                PassgateError::BadRequest(format!("passkey_approval.http_url invalid: {e}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(PassgateError::BadRequest(
                    "passkey_approval.http_url must be http or https".into(),
                ));
            }
        }
        if self.http_api_key().is_some() {
            HeaderName::from_bytes(self.http_api_key_header.as_bytes()).map_err(|e| {
                PassgateError::BadRequest(format!(
                    "passkey_approval.http_api_key_header invalid: {e}"
                ))
            })?;
        }
        if let Some(broker) = self.redis_broker() {
            store::StoreTarget::parse(broker)?;
        }
        Ok(())
    }

    // Empty strings in YAML count as "not configured".

    pub fn redis_broker(&self) -> Option<&str> {
        non_empty(&self.redis_broker)
    }

    pub fn http_url(&self) -> Option<&str> {
        non_empty(&self.http_url)
    }

    pub fn http_api_key(&self) -> Option<&str> {
        non_empty(&self.http_api_key)
    }

    pub fn encryption_key(&self) -> Option<&str> {
        non_empty(&self.encryption_key)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_seconds > 0).then(|| Duration::from_secs(self.cache_ttl_seconds))
    }

    pub fn store_timeouts(&self) -> store::StoreTimeouts {
        store::StoreTimeouts {
            read: millis(self.redis_read_timeout_ms),
            write: millis(self.redis_write_timeout_ms),
            connect: millis(self.redis_connect_timeout_ms),
        }
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn millis(ms: u64) -> Duration {
    match ms {
        0 => store::DEFAULT_STORE_TIMEOUT,
        ms => Duration::from_millis(ms),
    }
}

fn default_set_key() -> String {
    "pt:passkeys".into()
}
fn default_http_timeout_ms() -> u64 {
    5000
}
fn default_http_api_key_header() -> String {
    "X-API-Key".into()
}
