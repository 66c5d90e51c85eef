//! Cache Key Module
//!
//! A cache key is the value of one designated parameter, not a digest of the
//! whole argument list. The key carries its canonical string form (JSON text)
//! for map lookups, and can produce a fixed-length hashed form for
//! filesystem-safe persistent locations.

use serde_json::Value;
use sha2::{Digest, Sha256};

// == Cache Key ==
/// The designated argument value identifying a cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    value: Value,
    canonical: String,
}

impl CacheKey {
    // == Constructor ==
    /// Builds a key from an argument value.
    ///
    /// JSON `null` is the reserved "no value" sentinel: it yields `None`,
    /// which callers interpret as "do not cache this call". Callers whose
    /// real key values can be null must wrap them in another shape first.
    pub fn from_value(value: Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        let canonical = value.to_string();
        Some(Self { value, canonical })
    }

    /// The underlying argument value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Canonical string form (the value's JSON text), used for in-memory
    /// lookups and as the input to [`hashed`](Self::hashed).
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    // == Hashed Location ==
    /// SHA-256 hex digest of the canonical form.
    ///
    /// Fixed length and filesystem-safe regardless of what the key value
    /// looks like. Collisions are statistically negligible and not detected.
    pub fn hashed(&self) -> String {
        format!("{:x}", Sha256::digest(self.canonical.as_bytes()))
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}
