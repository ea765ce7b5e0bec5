//! Rate-limit counter store.
//!
//! # Data Flow
//! ```text
//! Protection layer
//!     → RateLimitStore::incr(key, ttl)   (atomic, sets TTL on first write)
//!     → post-increment count compared against the configured limit
//! ```
//!
//! # Design Decisions
//! - The store is a port: the core only needs get/put/incr with expiry and
//!   never retains a record past a single request
//! - Records expire on their own; the core performs no cleanup
//! - A store failure is surfaced as an error, and the caller decides the
//!   fail-open/fail-closed policy

pub mod memory;

use std::time::Duration;

use async_trait::async_trait;

pub use memory::MemoryStore;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A network-addressable counter store keyed by string.
///
/// The in-process [`MemoryStore`] is the default binding; a deployment may
/// substitute a KV service that implements the same contract.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Fetch the current value for a key, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<u64>, StoreError>;

    /// Store a value with a TTL, replacing any previous record.
    async fn put(&self, key: &str, value: u64, ttl: Duration) -> Result<(), StoreError>;

    /// Atomically increment a key and return the post-increment count.
    ///
    /// The TTL is set when the key is first created and left untouched on
    /// later increments, so a counter expires a fixed interval after its
    /// first write.
    async fn incr(&self, key: &str, ttl: Duration) -> Result<u64, StoreError>;
}
