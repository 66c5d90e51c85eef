//! funcache - function-result memoization
//!
//! Wraps a function so repeated calls with an equivalent designated argument
//! return the previously computed result. One bounded in-memory store with
//! pluggable eviction policies, one persistent disk-backed store, and a
//! composer that binds any function to either.
//!
//! ```
//! use funcache::{CanonicalArgs, MemoConfig, Memoized, MemoryCache, Param, Signature};
//! use serde_json::{json, Value};
//!
//! let signature = Signature::new(vec![
//!     Param::required("x"),
//!     Param::with_default("cache", json!(true)),
//! ]);
//!
//! let square: Memoized<MemoryCache, std::convert::Infallible> = Memoized::new(
//!     "square",
//!     signature,
//!     MemoryCache::lru(100),
//!     MemoConfig::new("x"),
//!     |args: &CanonicalArgs| {
//!         let x = args.get("x").and_then(Value::as_i64).unwrap_or(0);
//!         Ok(json!(x * x))
//!     },
//! )
//! .unwrap();
//!
//! assert_eq!(square.call_positional(&[json!(3)]).unwrap(), json!(9));
//! // Second call with the same key is served from the cache.
//! assert_eq!(square.call_positional(&[json!(3)]).unwrap(), json!(9));
//! ```

pub mod args;
pub mod cache;
pub mod disk;
pub mod error;
pub mod key;
pub mod memo;
pub mod tasks;
pub mod time;

pub use args::{normalize, should_cache, CacheDecision, CanonicalArgs, Param, Signature};
pub use cache::{CacheStats, EvictionPolicy, MemoryCache};
pub use disk::{DiskCache, JsonSerializer, Serializer, StoredEntry};
pub use error::{CacheError, Result};
pub use key::CacheKey;
pub use memo::{CacheBackend, MemoConfig, Memoized, DEFAULT_ENABLED_PARAM};
pub use tasks::{spawn_cleanup_task, spawn_disk_cleanup_task};
pub use time::{Clock, ManualClock, SystemClock};
