//! Filesystem Hygiene Module
//!
//! Keeps cache directories out of version control. The callback is injected
//! into the store at construction, so the store itself never hard-wires a
//! particular hygiene scheme and tests can swap in a no-op.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

// == Hygiene Callback ==
/// Invoked once per store initialization with the backing directory.
/// Failures are logged by the store, never propagated.
pub type HygieneFn = Arc<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

// == Ensure Gitignore ==
/// Default hygiene: create the directory and drop a `.gitignore` containing
/// `*` inside it if one doesn't exist.
pub fn ensure_gitignore(directory: &Path) -> io::Result<()> {
    fs::create_dir_all(directory)?;
    let marker = directory.join(".gitignore");
    if !marker.exists() {
        fs::write(&marker, "*")?;
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_marker() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cache");

        ensure_gitignore(&target).unwrap();

        let marker = target.join(".gitignore");
        assert_eq!(fs::read_to_string(marker).unwrap(), "*");
    }

    #[test]
    fn test_existing_marker_untouched() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join(".gitignore");
        fs::write(&marker, "custom").unwrap();

        ensure_gitignore(dir.path()).unwrap();

        assert_eq!(fs::read_to_string(marker).unwrap(), "custom");
    }

    #[test]
    fn test_idempotent() {
        let dir = TempDir::new().unwrap();
        ensure_gitignore(dir.path()).unwrap();
        ensure_gitignore(dir.path()).unwrap();
        assert!(dir.path().join(".gitignore").exists());
    }
}
