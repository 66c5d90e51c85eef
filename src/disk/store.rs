//! Disk Store Module
//!
//! One file per key under a backing directory, named by the SHA-256 digest
//! of the key's canonical form. Reads degrade to a miss on any failure so a
//! corrupted cache can never break the caller; writes go through a temporary
//! file and an atomic rename so concurrent readers never observe a torn
//! entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::disk::{ensure_gitignore, HygieneFn, JsonSerializer, Serializer, StoredEntry};
use crate::disk::DEFAULT_CACHE_ROOT;
use crate::error::Result;
use crate::key::CacheKey;
use crate::time::{expiry_after, Clock, SystemClock};

// Distinguishes temporary files written by concurrent puts of the same key
// in one process; the process id alone is not unique across threads.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// == Disk Cache ==
/// Persistent key-value store backed by the filesystem.
#[derive(Debug)]
pub struct DiskCache {
    /// Backing directory holding one file per entry
    dir: PathBuf,
    /// Per-entry lifetime; None = entries never expire
    expire: Option<Duration>,
    /// Byte-serializer collaborator
    serializer: Box<dyn Serializer>,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl DiskCache {
    // == Constructors ==
    /// Opens a store over the given directory with no expiration, the JSON
    /// serializer and the default gitignore hygiene.
    ///
    /// Fails only at initialization: if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(
            dir.into(),
            None,
            Box::new(JsonSerializer),
            Arc::new(SystemClock),
            Arc::new(|dir: &Path| ensure_gitignore(dir)),
        )
    }

    /// Opens a store over a directory derived from the wrapped function's
    /// identifier, so repeated decoration of the same function across
    /// restarts reuses the same directory.
    pub fn open_auto(function_id: &str) -> Result<Self> {
        Self::open(derive_cache_dir(function_id))
    }

    /// Opens a store with every collaborator injected.
    pub fn open_with(
        dir: PathBuf,
        expire: Option<Duration>,
        serializer: Box<dyn Serializer>,
        clock: Arc<dyn Clock>,
        hygiene: HygieneFn,
    ) -> Result<Self> {
        fs::create_dir_all(&dir)?;

        // Hygiene failures must not take the store down.
        if let Err(err) = hygiene(&dir) {
            warn!(dir = %dir.display(), error = %err, "cache directory hygiene failed");
        }

        info!(dir = %dir.display(), "disk cache initialized");
        Ok(Self {
            dir,
            expire,
            serializer,
            clock,
        })
    }

    /// Sets a per-entry lifetime. Entries written after this call expire
    /// once the duration elapses; a zero duration expires immediately.
    pub fn expire_after(mut self, expire: Duration) -> Self {
        self.expire = Some(expire);
        self
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.hashed()))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A missing file, an unreadable file or a record that fails to decode
    /// is a miss, never an error. An expired-but-present entry is removed
    /// on the spot and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let path = self.entry_path(key);

        let bytes = fs::read(&path).ok()?;
        let entry = match self.serializer.decode(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "undecodable entry treated as miss");
                return None;
            }
        };

        if entry.is_expired(self.clock.now_ms()) {
            let _ = fs::remove_file(&path);
            debug!(key = %key, "expired entry removed");
            return None;
        }

        debug!(key = %key, "disk cache hit");
        Some(entry.value)
    }

    // == Put ==
    /// Serializes and stores a value under the key's hashed location.
    ///
    /// The record is written to a temporary file in the same directory and
    /// atomically renamed into place, so a concurrent reader sees either the
    /// old entry or the new one, never a torn file.
    pub fn put(&self, key: &CacheKey, value: Value) -> Result<()> {
        let now = self.clock.now_ms();
        let expires_at = self.expire.map(|expire| expiry_after(now, expire));
        let entry = StoredEntry::new(value, now, expires_at);

        let bytes = self.serializer.encode(&entry)?;
        let path = self.entry_path(key);
        let tmp = self.dir.join(format!(
            "{}.json.tmp{}-{}",
            key.hashed(),
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed),
        ));

        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        debug!(key = %key, path = %path.display(), "disk cache store");
        Ok(())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether a file was removed.
    ///
    /// An absent entry is the quiet case; any other removal failure is
    /// logged so a permission problem does not masquerade as "not present".
    pub fn delete(&self, key: &CacheKey) -> bool {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to remove cache entry");
                false
            }
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries, returning how many were removed.
    ///
    /// Unreadable or undecodable files are skipped; they already behave as
    /// misses on read.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut removed = 0;

        for path in self.entry_files() {
            let Ok(bytes) = fs::read(&path) else { continue };
            let Ok(entry) = self.serializer.decode(&bytes) else {
                continue;
            };
            if entry.is_expired(now) && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        removed
    }

    /// Returns the current number of entry files.
    pub fn len(&self) -> usize {
        self.entry_files().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry_files(&self) -> impl Iterator<Item = PathBuf> {
        fs::read_dir(&self.dir)
            .into_iter()
            .flatten()
            .flatten()
            .map(|dir_entry| dir_entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
    }
}

// == Derive Cache Dir ==
/// Deterministic backing directory for a function identifier:
/// `.disk_cache/<digest prefix>-<sanitized identifier>`.
pub fn derive_cache_dir(function_id: &str) -> PathBuf {
    let digest = format!("{:x}", Sha256::digest(function_id.as_bytes()));
    let name: String = function_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    PathBuf::from(DEFAULT_CACHE_ROOT).join(format!("{}-{}", &digest[..16], name))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ManualClock;
    use serde_json::json;
    use tempfile::TempDir;

    fn key(text: &str) -> CacheKey {
        CacheKey::from_value(json!(text)).expect("non-null key")
    }

    fn open_in(dir: &TempDir) -> DiskCache {
        DiskCache::open(dir.path().join("store")).unwrap()
    }

    fn open_with_clock(dir: &TempDir, expire: Option<Duration>, clock: Arc<ManualClock>) -> DiskCache {
        DiskCache::open_with(
            dir.path().join("store"),
            expire,
            Box::new(JsonSerializer),
            clock,
            Arc::new(|dir: &Path| ensure_gitignore(dir)),
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);

        store.put(&key("a"), json!({"answer": 42})).unwrap();
        assert_eq!(store.get(&key("a")), Some(json!({"answer": 42})));
    }

    #[test]
    fn test_missing_entry_is_miss() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);
        assert_eq!(store.get(&key("nothing")), None);
    }

    #[test]
    fn test_init_writes_gitignore_marker() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);
        assert!(store.dir().join(".gitignore").exists());
    }

    #[test]
    fn test_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("store");

        {
            let store = DiskCache::open(&dir).unwrap();
            store.put(&key("persisted"), json!([1, 2, 3])).unwrap();
        }

        // Fresh instance over the same directory, as after a restart.
        let store = DiskCache::open(&dir).unwrap();
        assert_eq!(store.get(&key("persisted")), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_zero_expire_misses_immediately() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = open_with_clock(&tmp, Some(Duration::ZERO), clock);

        store.put(&key("a"), json!(42)).unwrap();
        assert_eq!(store.get(&key("a")), None);
    }

    #[test]
    fn test_no_expire_always_hits() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = open_with_clock(&tmp, None, clock.clone());

        store.put(&key("a"), json!(42)).unwrap();
        clock.advance(u64::MAX / 2);
        assert_eq!(store.get(&key("a")), Some(json!(42)));
    }

    #[test]
    fn test_expired_entry_physically_removed_on_read() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let store = open_with_clock(&tmp, Some(Duration::from_secs(1)), clock.clone());

        store.put(&key("a"), json!(1)).unwrap();
        assert_eq!(store.len(), 1);

        clock.advance(1_000);
        assert_eq!(store.get(&key("a")), None);
        assert_eq!(store.len(), 0, "expired file removed on read");
    }

    #[test]
    fn test_corrupted_file_is_miss() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);
        let k = key("a");

        store.put(&k, json!(1)).unwrap();
        fs::write(store.dir().join(format!("{}.json", k.hashed())), b"garbage").unwrap();

        assert_eq!(store.get(&k), None);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);

        store.put(&key("a"), json!("old")).unwrap();
        store.put(&key("a"), json!("new")).unwrap();

        assert_eq!(store.get(&key("a")), Some(json!("new")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);

        store.put(&key("a"), json!(1)).unwrap();
        assert!(store.delete(&key("a")));
        assert!(!store.delete(&key("a")));
        assert_eq!(store.get(&key("a")), None);
    }

    #[test]
    fn test_concurrent_puts_on_one_key_never_collide() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(open_in(&tmp));

        // Each thread writes its own value under the shared key; every write
        // must go through its own temporary file and succeed.
        let writers: Vec<_> = (0..2)
            .map(|thread_id| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store
                            .put(&key("shared"), json!({"writer": thread_id, "round": i}))
                            .unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        // Whichever write landed last, the stored record is intact.
        let value = store.get(&key("shared")).expect("entry present");
        assert!(value.get("writer").is_some());
        assert!(value.get("round").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_extreme_expire_never_expires() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = open_with_clock(&tmp, Some(Duration::MAX), clock.clone());

        store.put(&key("a"), json!(42)).unwrap();
        clock.advance(u64::MAX / 2);
        assert_eq!(store.get(&key("a")), Some(json!(42)));
    }

    #[test]
    fn test_delete_reports_false_on_removal_failure() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);
        let k = key("a");

        // A directory at the entry path makes remove_file fail with
        // something other than NotFound, even when running as root.
        fs::create_dir(store.dir().join(format!("{}.json", k.hashed()))).unwrap();

        assert!(!store.delete(&k));
        assert!(store.dir().join(format!("{}.json", k.hashed())).exists());
    }

    #[test]
    fn test_purge_expired() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let store = open_with_clock(&tmp, Some(Duration::from_secs(1)), clock.clone());

        store.put(&key("old"), json!(1)).unwrap();
        clock.advance(500);
        store.put(&key("young"), json!(2)).unwrap();
        clock.advance(600);

        let removed = store.purge_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key("young")), Some(json!(2)));
    }

    #[test]
    fn test_expire_after_builder() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp).expire_after(Duration::ZERO);

        store.put(&key("a"), json!(1)).unwrap();
        // Zero lifetime with the system clock: expired by the time we read.
        assert_eq!(store.get(&key("a")), None);
    }

    #[test]
    fn test_put_fails_when_directory_removed() {
        let tmp = TempDir::new().unwrap();
        let store = open_in(&tmp);

        fs::remove_dir_all(store.dir()).unwrap();

        assert!(store.put(&key("a"), json!(1)).is_err());
        // Reads stay non-fatal.
        assert_eq!(store.get(&key("a")), None);
    }

    #[test]
    fn test_derive_cache_dir_is_deterministic() {
        let a = derive_cache_dir("pkg::fetch_user");
        let b = derive_cache_dir("pkg::fetch_user");
        let c = derive_cache_dir("pkg::fetch_page");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with(DEFAULT_CACHE_ROOT));
        assert!(a.to_string_lossy().contains("pkg__fetch_user"));
    }

    #[test]
    fn test_hygiene_failure_is_nonfatal() {
        let tmp = TempDir::new().unwrap();
        let store = DiskCache::open_with(
            tmp.path().join("store"),
            None,
            Box::new(JsonSerializer),
            Arc::new(SystemClock),
            Arc::new(|_: &Path| -> std::io::Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "hygiene broke"))
            }),
        )
        .unwrap();

        store.put(&key("a"), json!(1)).unwrap();
        assert_eq!(store.get(&key("a")), Some(json!(1)));
    }
}
