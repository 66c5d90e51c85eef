//! Memoization Module
//!
//! Binds a target function to a store, producing a wrapped callable with the
//! same call shape. Composition over inheritance: the wrapper closes over
//! the function and the chosen store, and preserves the function's
//! introspectable metadata.

mod wrapper;

// Re-export public types
pub use wrapper::{CacheBackend, MemoConfig, Memoized, DEFAULT_ENABLED_PARAM};
