//! In-memory config store for unit testing.
//!
//! Lets tests run the configure use case without touching the disk, and
//! records how many reads and writes happened so tests can assert that
//! validation failures never reach the store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::{ConfigStore, StoreError};

/// A mock implementation of [`ConfigStore`] backed by a map of paths to text.
pub struct MemoryConfigStore {
    files: Mutex<HashMap<PathBuf, String>>,
    reads: Mutex<u32>,
    writes: Mutex<u32>,
    fail_writes: Mutex<bool>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            reads: Mutex::new(0),
            writes: Mutex::new(0),
            fail_writes: Mutex::new(false),
        }
    }

    /// Seeds (or replaces) a file.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .expect("lock poisoned")
            .insert(path.into(), contents.into());
    }

    /// Current contents of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("lock poisoned")
            .get(path.as_ref())
            .cloned()
    }

    /// Makes every subsequent write fail with a permission error.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().expect("lock poisoned") = true;
    }

    /// Number of successful [`ConfigStore::read`] calls.
    pub fn read_count(&self) -> u32 {
        *self.reads.lock().expect("lock poisoned")
    }

    /// Number of successful [`ConfigStore::write`] calls.
    pub fn write_count(&self) -> u32 {
        *self.writes.lock().expect("lock poisoned")
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn absolute(&self, path: &Path) -> Result<PathBuf, StoreError> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(Path::new("/").join(path))
        }
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        let contents = self
            .contents(path)
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_path_buf(),
            })?;
        *self.reads.lock().expect("lock poisoned") += 1;
        Ok(contents)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(StoreError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.insert(path, contents);
        *self.writes.lock().expect("lock poisoned") += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trips_contents() {
        // Arrange
        let store = MemoryConfigStore::new();
        store.insert("/a/Config.h", "one\n");

        // Act
        store.write(Path::new("/a/Config.h"), "two\n").unwrap();

        // Assert
        assert_eq!(store.read(Path::new("/a/Config.h")).unwrap(), "two\n");
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 1);
    }

    #[test]
    fn test_memory_store_missing_path_is_not_found() {
        let store = MemoryConfigStore::new();
        let err = store.read(Path::new("/nope.h")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.read_count(), 0);
    }

    #[test]
    fn test_memory_store_failed_write_leaves_contents() {
        let store = MemoryConfigStore::new();
        store.insert("/a/Config.h", "one\n");
        store.fail_writes();

        let err = store.write(Path::new("/a/Config.h"), "two\n").unwrap_err();

        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.contents("/a/Config.h").as_deref(), Some("one\n"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_memory_store_anchors_relative_paths_at_root() {
        let store = MemoryConfigStore::new();
        assert_eq!(
            store.absolute(Path::new("src/Config.h")).unwrap(),
            PathBuf::from("/src/Config.h")
        );
    }
}
