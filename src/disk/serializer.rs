//! Serializer Module
//!
//! The opaque byte-serializer seam of the persistent store: encode a stored
//! record to bytes, decode bytes back, fail with a serialization error on
//! malformed input. The default is JSON, but the trait lets callers swap in
//! any format without touching the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// == Stored Entry ==
/// The record persisted for one key: the value plus expiry metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
    /// The cached function result
    pub value: Value,
}

impl StoredEntry {
    pub fn new(value: Value, created_at: u64, expires_at: Option<u64>) -> Self {
        Self {
            created_at,
            expires_at,
            value,
        }
    }

    /// Same boundary semantics as the in-memory entry: expired once the
    /// current time reaches the expiration time.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

// == Serializer Trait ==
/// Byte-serializer collaborator of the persistent store.
pub trait Serializer: Send + Sync + std::fmt::Debug {
    /// Encodes a record to bytes.
    fn encode(&self, entry: &StoredEntry) -> Result<Vec<u8>>;

    /// Decodes bytes back into a record. Malformed input yields
    /// [`crate::error::CacheError::Serialization`], which the store
    /// downgrades to a miss on reads.
    fn decode(&self, bytes: &[u8]) -> Result<StoredEntry>;
}

// == JSON Serializer ==
/// Default serializer backed by serde_json.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode(&self, entry: &StoredEntry) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(entry)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<StoredEntry> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
