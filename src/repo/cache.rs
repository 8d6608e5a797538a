//! repo::cache
//!
//! Content cache store.
//!
//! Unrelated to reconciliation: the cache holds rendered content fragments
//! keyed by the serving layer, and the only operation this tool offers is a
//! full flush. Exposed behind a small trait so the CLI command does not
//! depend on the directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to flush cache entry '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A flushable content cache.
pub trait CacheStore {
    /// Remove every cache entry, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if an entry cannot be removed.
    fn flush(&self) -> Result<usize, CacheError>;
}

/// A cache stored as files under a directory.
///
/// A missing directory is an empty cache; flush never creates it.
#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    /// Create a cache over the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CacheStore for DirCache {
    fn flush(&self) -> Result<usize, CacheError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| CacheError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| CacheError::Io {
                path: path.clone(),
                source: e,
            })?;
            removed += 1;
        }

        Ok(removed)
    }
}
