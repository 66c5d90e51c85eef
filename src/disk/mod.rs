//! Disk Module
//!
//! Filesystem-backed key-value store with per-entry expiration and hashed
//! key-to-file locations, surviving process restarts.

mod hygiene;
mod serializer;
mod store;

// Re-export public types
pub use hygiene::{ensure_gitignore, HygieneFn};
pub use serializer::{JsonSerializer, Serializer, StoredEntry};
pub use store::{derive_cache_dir, DiskCache};

// == Public Constants ==
/// Root for auto-derived cache directories
pub const DEFAULT_CACHE_ROOT: &str = ".disk_cache";
