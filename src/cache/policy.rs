//! Eviction Policy Module
//!
//! A closed set of removal strategies consumed by one generic bounded store.
//! Each variant defines how the victim is chosen when the store is full and
//! whether expiry is checked eagerly (on every insert) or lazily (on access
//! and when space is needed).

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;

use crate::cache::MemoryEntry;

// == Eviction Policy ==
/// Removal strategy for a bounded in-memory store.
///
/// All victim selections break ties by earliest insertion order, so eviction
/// is deterministic and testable (Random excepted, by nature).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Removes the entry with the oldest last access.
    Lru,
    /// Removes the entry with the smallest access count.
    Lfu,
    /// Removes the entry with the oldest insertion.
    Fifo,
    /// Removes a uniformly random entry.
    Random,
    /// Removes expired entries eagerly on every insert; overflow falls back
    /// to oldest insertion.
    Ttl { ttl: Duration },
    /// Removes expired entries only when accessed or when space is needed;
    /// overflow removes the soonest-expiring entry.
    Vttl { ttl: Duration },
}

impl EvictionPolicy {
    /// The TTL applied to entries under this policy, if any.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            EvictionPolicy::Ttl { ttl } | EvictionPolicy::Vttl { ttl } => Some(*ttl),
            _ => None,
        }
    }

    /// Whether expired entries are swept on every insert.
    pub fn eager_expiry(&self) -> bool {
        matches!(self, EvictionPolicy::Ttl { .. })
    }

    /// Whether expired entries are removed only on access or overflow.
    pub fn lazy_expiry(&self) -> bool {
        matches!(self, EvictionPolicy::Vttl { .. })
    }

    /// Short name for log events.
    pub fn name(&self) -> &'static str {
        match self {
            EvictionPolicy::Lru => "lru",
            EvictionPolicy::Lfu => "lfu",
            EvictionPolicy::Fifo => "fifo",
            EvictionPolicy::Random => "random",
            EvictionPolicy::Ttl { .. } => "ttl",
            EvictionPolicy::Vttl { .. } => "vttl",
        }
    }

    // == Select Victim ==
    /// Picks the key to remove when the store is full.
    ///
    /// Returns None only when the store is empty.
    pub(crate) fn select_victim(&self, entries: &HashMap<String, MemoryEntry>) -> Option<String> {
        if entries.is_empty() {
            return None;
        }

        let victim = match self {
            EvictionPolicy::Lru => entries
                .iter()
                .min_by_key(|(_, e)| (e.last_access, e.inserted)),
            EvictionPolicy::Lfu => entries.iter().min_by_key(|(_, e)| (e.hits, e.inserted)),
            EvictionPolicy::Fifo | EvictionPolicy::Ttl { .. } => {
                entries.iter().min_by_key(|(_, e)| e.inserted)
            }
            EvictionPolicy::Vttl { .. } => entries
                .iter()
                .min_by_key(|(_, e)| (e.expires_at.unwrap_or(u64::MAX), e.inserted)),
            EvictionPolicy::Random => {
                let index = rand::thread_rng().gen_range(0..entries.len());
                entries.iter().nth(index)
            }
        };

        victim.map(|(key, _)| key.clone())
    }
}

impl std::fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
