//! The bounded, TTL-based agent-metadata cache (spec.md §3 "Cache entry",
//! §4.3 "Cache").
//!
//! Backed by a sharded [`dashmap::DashMap`] rather than one `RwLock` over
//! the whole table, so a read for one `Did` never blocks a concurrent read
//! or write for another — the same concern `x402-rs`'s per-address nonce
//! cache solves with `Arc<DashMap<..>>`. Entries returned to callers are
//! detached copies — later evictions never mutate what a caller already
//! holds, per spec.md §3 "Ownership".

use std::time::{Duration, Instant};

use dashmap::DashMap;

use sage_types::{AgentMetadata, Did};

struct CacheEntry {
    metadata: AgentMetadata,
    expires_at: Instant,
}

/// A bounded, TTL-based cache from [`Did`] to [`AgentMetadata`].
pub struct MetadataCache {
    entries: DashMap<Did, CacheEntry>,
    max_items: usize,
    ttl: Duration,
}

impl MetadataCache {
    /// Constructs an empty cache holding at most `max_items` entries, each
    /// valid for `ttl` from insertion.
    pub fn new(max_items: usize, ttl: Duration) -> Self {
        MetadataCache {
            entries: DashMap::new(),
            max_items,
            ttl,
        }
    }

    /// Returns a fresh copy of the cached metadata for `did`, or `None` on
    /// a miss or an expired entry. Readers never evict — cleanup is the
    /// writer-side [`MetadataCache::cleanup`] operation.
    pub fn get(&self, did: &Did) -> Option<AgentMetadata> {
        let entry = self.entries.get(did)?;
        if entry.expires_at <= Instant::now() {
            tracing::debug!(%did, "cache entry expired");
            return None;
        }
        tracing::debug!(%did, "cache hit");
        Some(entry.metadata.clone())
    }

    /// Inserts or refreshes `metadata` for `did`, expiring after this
    /// cache's configured TTL. If the cache is at capacity and `did` is not
    /// already present, the entry with the earliest `expires_at` is
    /// evicted first (approximate LRU by TTL, per spec.md §3).
    pub fn insert(&self, did: Did, metadata: AgentMetadata) {
        if self.entries.len() >= self.max_items && !self.entries.contains_key(&did) {
            let evict_key = self
                .entries
                .iter()
                .min_by_key(|entry| entry.expires_at)
                .map(|entry| entry.key().clone());
            if let Some(evict_key) = evict_key {
                tracing::debug!(did = %evict_key, "evicting cache entry to make room");
                self.entries.remove(&evict_key);
            }
        }
        self.entries.insert(
            did,
            CacheEntry {
                metadata,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Purges every expired entry. Safe to call periodically; never blocks
    /// a reader or writer working on a different shard.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// The number of entries currently tracked, including expired-but-not-yet-evicted ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no entries are tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
