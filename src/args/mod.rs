//! Arguments Module
//!
//! Turns heterogeneous calls (positional + named values) into one canonical
//! name-keyed mapping, and decides per call whether caching applies.

mod gate;
mod normalize;
mod signature;

// Re-export public types
pub use gate::{should_cache, CacheDecision};
pub use normalize::{normalize, CanonicalArgs};
pub use signature::{Param, Signature};
