//! Cache Module
//!
//! Bounded in-memory key-value store with a replaceable eviction policy and
//! TTL expiration.

mod entry;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use entry::MemoryEntry;
pub use policy::EvictionPolicy;
pub use stats::CacheStats;
pub use store::MemoryCache;

// == Public Constants ==
/// Default bound for stores created without an explicit maxsize
pub const DEFAULT_MAXSIZE: usize = 1000;
