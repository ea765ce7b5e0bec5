//! In-process rate-limit store backed by DashMap.
//!
//! Expiry is lazy: a record past its deadline is treated as absent and reset
//! on the next write. A periodic purge keeps dead buckets from accumulating.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{RateLimitStore, StoreError};

#[derive(Debug)]
struct Record {
    value: u64,
    expires_at: Instant,
}

/// DashMap-backed store. Per-key operations are atomic under the map's
/// shard lock, which is what makes `incr` safe under concurrency.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired record. Called from a background task; correctness
    /// does not depend on it.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.records.retain(|_, record| record.expires_at > now);
    }

    /// Number of live (unexpired) records.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.records
            .iter()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let now = Instant::now();
        Ok(self
            .records
            .get(key)
            .filter(|record| record.expires_at > now)
            .map(|record| record.value))
    }

    async fn put(&self, key: &str, value: u64, ttl: Duration) -> Result<(), StoreError> {
        self.records.insert(
            key.to_string(),
            Record {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        let now = Instant::now();
        let mut record = self
            .records
            .entry(key.to_string())
            .or_insert_with(|| Record {
                value: 0,
                expires_at: now + ttl,
            });

        if record.expires_at <= now {
            record.value = 0;
            record.expires_at = now + ttl;
        }
        record.value += 1;
        Ok(record.value)
    }
}
