//! File-system implementation of [`ConfigStore`].
//!
//! Reads the header as UTF-8 text and writes the whole rewritten buffer back
//! in one go.  With `atomic` set (the default), the new text is written to a
//! temporary file in the same directory and renamed over the target, so a
//! failed write leaves the original header intact.  The temporary file takes
//! the target's permissions before the rename.  A symlinked target is
//! resolved first so the file it points at is the one replaced.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::application::{ConfigStore, StoreError};

/// Reads and writes headers on the local file system.
#[derive(Debug, Clone, Copy)]
pub struct FileConfigStore {
    atomic: bool,
}

impl FileConfigStore {
    pub fn new(atomic: bool) -> Self {
        Self { atomic }
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        // Renaming over a symlink would replace the link, so write next to
        // the file it points at.
        let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        if let Ok(meta) = std::fs::metadata(&target) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(write_err)?;
        }

        tmp.persist(&target).map_err(|e| write_err(e.error))?;
        debug!(path = %path.display(), target = %target.display(), "config replaced via rename");
        Ok(())
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConfigStore for FileConfigStore {
    fn absolute(&self, path: &Path) -> Result<PathBuf, StoreError> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(|source| StoreError::Resolve {
                path: path.to_path_buf(),
                source,
            })
    }

    fn read(&self, path: &Path) -> Result<String, StoreError> {
        if !path.is_file() {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        if self.atomic {
            return self.write_atomic(path, contents);
        }
        std::fs::write(path, contents).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
