//! Expiry Cleanup Tasks
//!
//! Background tasks that periodically remove expired cache entries, so
//! TTL-bearing stores don't hold dead entries (or leak disk space) between
//! accesses. Both tasks run until aborted.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;
use crate::disk::DiskCache;

// == Memory Cleanup ==
/// Spawns a task that sweeps expired entries from the in-memory cache at the
/// given interval.
///
/// The store carries its own lock, so the task needs only a shared handle.
/// Returns the task's JoinHandle; abort it for shutdown.
pub fn spawn_cleanup_task(cache: Arc<MemoryCache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting memory cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!(removed, "memory cleanup removed expired entries");
            } else {
                debug!("memory cleanup found no expired entries");
            }
        }
    })
}

// == Disk Cleanup ==
/// Spawns a task that purges expired entry files from a disk cache at the
/// given interval.
pub fn spawn_disk_cleanup_task(cache: Arc<DiskCache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, dir = %cache.dir().display(), "starting disk cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();
            if removed > 0 {
                info!(removed, "disk cleanup removed expired entries");
            } else {
                debug!("disk cleanup found no expired entries");
            }
        }
    })
}
