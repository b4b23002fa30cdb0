//! In-process set store for single-node deployments and tests.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use super::{SetStore, StoreError};

#[derive(Debug, Default)]
struct MemorySet {
    members: HashSet<String>,
    expires_at: Option<Instant>,
}

impl MemorySet {
    fn expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// `set -> members` with one expiry per set, like Redis `EXPIRE`.
#[derive(Debug, Default)]
pub struct MemorySetStore {
    sets: DashMap<String, MemorySet>,
}

impl MemorySetStore {
    pub fn new() -> Self {
        Self {
            sets: DashMap::new(),
        }
    }

    /// Number of live members in `set`.
    pub fn len(&self, set: &str) -> usize {
        let now = Instant::now();
        self.sets
            .get(set)
            .filter(|s| !s.expired(now))
            .map_or(0, |s| s.members.len())
    }

    pub fn is_empty(&self, set: &str) -> bool {
        self.len(set) == 0
    }
}

#[async_trait]
impl SetStore for MemorySetStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn is_member(&self, set: &str, member: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        // Drop the whole set once expired, as Redis would.
        if self.sets.remove_if(set, |_, s| s.expired(now)).is_some() {
            return Ok(false);
        }
        Ok(self
            .sets
            .get(set)
            .is_some_and(|s| s.members.contains(member)))
    }

    async fn add_with_ttl(&self, set: &str, member: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entry = self.sets.entry(set.to_string()).or_default();
        if entry.expired(now) {
            *entry = MemorySet::default();
        }
        entry.members.insert(member.to_string());
        entry.expires_at = (!ttl.is_zero()).then(|| now + ttl);
        Ok(())
    }
}
