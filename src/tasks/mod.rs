//! Background Tasks Module
//!
//! Periodic maintenance for long-lived stores: sweeping expired entries out
//! of the in-memory cache and expired files out of a disk cache directory.

mod cleanup;

pub use cleanup::{spawn_cleanup_task, spawn_disk_cleanup_task};
