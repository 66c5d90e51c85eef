//! Memory Entry Module
//!
//! Defines the structure for individual in-memory cache entries along with
//! the per-policy metadata (recency, frequency, insertion order, expiry).

use serde_json::Value;

// == Memory Entry ==
/// A single in-memory cache entry with value and policy metadata.
///
/// Recency and insertion order use a monotonic sequence number handed out by
/// the owning store, not wall-clock time, so victim selection is
/// deterministic even when operations land within the same millisecond.
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Sequence number of the most recent access or overwrite
    pub last_access: u64,
    /// Number of reads since insertion (writes do not count)
    pub hits: u64,
    /// Sequence number fixed at first insertion, untouched by overwrites
    pub inserted: u64,
}

impl MemoryEntry {
    // == Constructor ==
    pub fn new(value: Value, created_at: u64, expires_at: Option<u64>, seq: u64) -> Self {
        Self {
            value,
            created_at,
            expires_at,
            last_access: seq,
            hits: 0,
            inserted: seq,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at the given instant.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiration time, so a zero TTL expires
    /// immediately.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining TTL in milliseconds, or None when the entry never expires.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expires_at
            .map(|expires| expires.saturating_sub(now_ms))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_no_ttl_never_expires() {
        let entry = MemoryEntry::new(json!("v"), 1_000, None, 1);

        assert!(!entry.is_expired(u64::MAX));
        assert!(entry.ttl_remaining_ms(1_000).is_none());
    }

    #[test]
    fn test_entry_expiry_boundary() {
        let entry = MemoryEntry::new(json!("v"), 1_000, Some(2_000), 1);

        assert!(!entry.is_expired(1_999));
        assert!(entry.is_expired(2_000), "expired at exact boundary");
        assert!(entry.is_expired(3_000));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = MemoryEntry::new(json!("v"), 1_000, Some(2_000), 1);

        assert_eq!(entry.ttl_remaining_ms(1_400), Some(600));
        assert_eq!(entry.ttl_remaining_ms(2_500), Some(0));
    }

    #[test]
    fn test_new_entry_metadata() {
        let entry = MemoryEntry::new(json!(1), 5, None, 9);

        assert_eq!(entry.inserted, 9);
        assert_eq!(entry.last_access, 9);
        assert_eq!(entry.hits, 0);
    }
}
