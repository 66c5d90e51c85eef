//! Error types for the memoization engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache machinery.
///
/// Errors raised by the user's wrapped function are never wrapped in this
/// type; they propagate through [`crate::memo::Memoized::call`] unchanged.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A designated parameter name does not exist on the target signature.
    /// Raised at decoration time, never per-call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value could not be encoded or decoded by the serializer.
    /// On reads this is downgraded to a miss at the store boundary; it only
    /// surfaces from writes.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The filesystem was unavailable (permissions, disk full, missing
    /// directory). Surfaced from `put`; reads degrade to a miss instead.
    #[error("storage I/O failure: {0}")]
    StorageIo(#[from] std::io::Error),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache machinery.
pub type Result<T> = std::result::Result<T, CacheError>;
