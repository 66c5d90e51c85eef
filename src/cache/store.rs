//! Memory Store Module
//!
//! Bounded in-memory store combining HashMap storage with per-policy victim
//! selection and TTL expiration. The store owns its own lock, so callers may
//! share it across threads without external synchronization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheStats, EvictionPolicy, MemoryEntry};
use crate::key::CacheKey;
use crate::time::{expiry_after, Clock, SystemClock};

// == Memory Cache ==
/// Bounded key-value store with a replaceable eviction policy.
#[derive(Debug)]
pub struct MemoryCache {
    /// Map plus statistics behind one mutex
    inner: Mutex<Inner>,
    /// Maximum number of entries allowed
    maxsize: usize,
    /// Active eviction policy
    policy: EvictionPolicy,
    /// Time source for TTL checks
    clock: Arc<dyn Clock>,
}

#[derive(Debug)]
struct Inner {
    entries: HashMap<String, MemoryEntry>,
    stats: CacheStats,
    /// Monotonic operation counter; feeds recency and insertion order.
    seq: u64,
}

impl MemoryCache {
    // == Constructors ==
    /// Creates a store with the given bound and policy, on the system clock.
    ///
    /// # Panics
    /// Panics if `maxsize` is zero; a bounded store needs room for at least
    /// one entry.
    pub fn new(maxsize: usize, policy: EvictionPolicy) -> Self {
        Self::with_clock(maxsize, policy, Arc::new(SystemClock))
    }

    /// Creates a store with an injected time source.
    pub fn with_clock(maxsize: usize, policy: EvictionPolicy, clock: Arc<dyn Clock>) -> Self {
        assert!(maxsize > 0, "maxsize must be positive");
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
                seq: 0,
            }),
            maxsize,
            policy,
            clock,
        }
    }

    /// Least-recently-used eviction.
    pub fn lru(maxsize: usize) -> Self {
        Self::new(maxsize, EvictionPolicy::Lru)
    }

    /// Least-frequently-used eviction.
    pub fn lfu(maxsize: usize) -> Self {
        Self::new(maxsize, EvictionPolicy::Lfu)
    }

    /// Insertion-order eviction.
    pub fn fifo(maxsize: usize) -> Self {
        Self::new(maxsize, EvictionPolicy::Fifo)
    }

    /// Uniformly random eviction.
    pub fn random(maxsize: usize) -> Self {
        Self::new(maxsize, EvictionPolicy::Random)
    }

    /// Eager per-entry expiration: expired entries are swept on every insert.
    pub fn ttl(maxsize: usize, ttl: Duration) -> Self {
        Self::new(maxsize, EvictionPolicy::Ttl { ttl })
    }

    /// Lazy per-entry expiration: expired entries are removed on access or
    /// when space is needed.
    pub fn vttl(maxsize: usize, ttl: Duration) -> Self {
        Self::new(maxsize, EvictionPolicy::Vttl { ttl })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if present and not expired. An expired entry
    /// encountered on access is removed, freeing its slot, and counts as a
    /// miss.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now_ms();
        let mut guard = self.lock();
        guard.seq += 1;
        let seq = guard.seq;
        let Inner { entries, stats, .. } = &mut *guard;

        if let Some(entry) = entries.get_mut(key.canonical()) {
            if !entry.is_expired(now) {
                entry.last_access = seq;
                entry.hits += 1;
                stats.record_hit();
                return Some(entry.value.clone());
            }
        } else {
            stats.record_miss();
            return None;
        }

        // Present but expired: drop it on the way out.
        entries.remove(key.canonical());
        stats.record_expiration();
        stats.record_miss();
        stats.set_total_entries(entries.len());
        None
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// Overwriting refreshes the value, recency and expiry but leaves the
    /// access count and insertion order untouched. Inserting a new key into
    /// a full store removes exactly one victim per the active policy, after
    /// any expiry sweep the policy calls for.
    pub fn put(&self, key: &CacheKey, value: Value) {
        let now = self.clock.now_ms();
        let mut guard = self.lock();
        guard.seq += 1;
        let seq = guard.seq;
        let Inner { entries, stats, .. } = &mut *guard;

        let expires_at = self.policy.ttl().map(|ttl| expiry_after(now, ttl));

        if self.policy.eager_expiry() {
            sweep_expired(entries, stats, now);
        }

        if let Some(entry) = entries.get_mut(key.canonical()) {
            entry.value = value;
            entry.last_access = seq;
            entry.expires_at = expires_at;
            stats.set_total_entries(entries.len());
            return;
        }

        if entries.len() >= self.maxsize {
            if self.policy.lazy_expiry() {
                sweep_expired(entries, stats, now);
            }
            if entries.len() >= self.maxsize {
                if let Some(victim) = self.policy.select_victim(entries) {
                    entries.remove(&victim);
                    stats.record_eviction();
                    debug!(policy = %self.policy, key = %victim, "evicted entry");
                }
            }
        }

        entries.insert(
            key.canonical().to_string(),
            MemoryEntry::new(value, now, expires_at, seq),
        );
        stats.set_total_entries(entries.len());
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it was present.
    pub fn delete(&self, key: &CacheKey) -> bool {
        let mut guard = self.lock();
        let Inner { entries, stats, .. } = &mut *guard;
        let removed = entries.remove(key.canonical()).is_some();
        stats.set_total_entries(entries.len());
        removed
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut guard = self.lock();
        let Inner { entries, stats, .. } = &mut *guard;
        let removed = sweep_expired(entries, stats, now);
        stats.set_total_entries(entries.len());
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let guard = self.lock();
        let mut stats = guard.stats.clone();
        stats.set_total_entries(guard.entries.len());
        stats
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// The active eviction policy.
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// The configured bound.
    pub fn maxsize(&self) -> usize {
        self.maxsize
    }
}

impl Default for MemoryCache {
    /// LRU store with the crate default bound.
    fn default() -> Self {
        Self::lru(crate::cache::DEFAULT_MAXSIZE)
    }
}

fn sweep_expired(
    entries: &mut HashMap<String, MemoryEntry>,
    stats: &mut CacheStats,
    now: u64,
) -> usize {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_expired(now))
        .map(|(key, _)| key.clone())
        .collect();

    let count = expired.len();
    for key in expired {
        entries.remove(&key);
        stats.record_expiration();
    }
    count
}
