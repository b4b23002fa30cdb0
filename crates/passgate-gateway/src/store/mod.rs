//! Cache store for approved passkeys.
//!
//! The store is advisory: a hit approves, but a miss or any store error only
//! means "no information" and never rejects a request on its own. Two
//! operations are consumed, each a single store command (or a two-command
//! pipeline for the write), so no cross-request locking is needed.

pub mod memory;
pub mod redis;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use passgate_core::error::{PassgateError, Result};

pub use self::memory::MemorySetStore;
pub use self::redis::{parse_redis_url, RedisSetStore};

/// Store failures. Logged by callers, never surfaced to tracker clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("{0} timed out")]
    Timeout(&'static str),
}

/// Set membership with whole-set expiry.
#[async_trait]
pub trait SetStore: Send + Sync {
    /// Short label for logs and metrics.
    fn kind(&self) -> &'static str;

    async fn is_member(&self, set: &str, member: &str) -> std::result::Result<bool, StoreError>;

    /// Add `member` to `set`, then set/refresh the TTL of the whole set.
    async fn add_with_ttl(
        &self,
        set: &str,
        member: &str,
        ttl: Duration,
    ) -> std::result::Result<(), StoreError>;
}

/// Bound applied to a store operation when the config leaves it at 0.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Per-operation bounds for network stores. Always finite.
#[derive(Debug, Clone, Copy)]
pub struct StoreTimeouts {
    pub read: Duration,
    pub write: Duration,
    pub connect: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            read: DEFAULT_STORE_TIMEOUT,
            write: DEFAULT_STORE_TIMEOUT,
            connect: DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// Parsed `redis_broker` value.
#[derive(Debug, Clone)]
pub enum StoreTarget {
    Memory,
    Redis(::redis::ConnectionInfo),
}

impl StoreTarget {
    pub fn parse(target: &str) -> Result<Self> {
        if target == "memory://" {
            return Ok(StoreTarget::Memory);
        }
        parse_redis_url(target).map(StoreTarget::Redis)
    }
}

/// Build the store selected by `redis_broker`. Connections are lazy, so an
/// unreachable Redis does not fail startup.
pub fn open_store(target: &str, timeouts: StoreTimeouts) -> Result<Arc<dyn SetStore>> {
    match StoreTarget::parse(target)? {
        StoreTarget::Memory => Ok(Arc::new(MemorySetStore::new())),
        StoreTarget::Redis(info) => {
            let store = RedisSetStore::new(info, timeouts)
                .map_err(|e| PassgateError::BadRequest(format!("redis client: {e}")))?;
            Ok(Arc::new(store))
        }
    }
}
