//! core::lock
//!
//! Exclusive lock for maintenance runs.
//!
//! # Architecture
//!
//! The run lock ensures only one mutating maintenance run executes against a
//! content repository at a time. The reconciliation core itself performs no
//! locking or cross-run deduplication; run serialization is a policy of the
//! surrounding driver, and this lock is that policy.
//!
//! # Storage
//!
//! - `<repository root>/.nodetend.lock` - lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - The lock is held for the whole mutating run
//! - The lock is released on drop (RAII)
//! - Acquisition is non-blocking (fails fast if locked)
//! - Dry runs and read-only commands do not take the lock
//!
//! # Example
//!
//! ```no_run
//! use nodetend::core::lock::RunLock;
//! use std::path::Path;
//!
//! let lock = RunLock::acquire(Path::new("/srv/content")).unwrap();
//! assert!(lock.is_held());
//! // ... perform the run ...
//! drop(lock); // released here, or at end of scope
//! ```

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// File name of the lock within the repository root.
const LOCK_FILE_NAME: &str = ".nodetend.lock";

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("repository is locked by another maintenance run")]
    AlreadyLocked,

    /// Failed to create the lock file.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on a content repository.
///
/// The lock is automatically released when this guard is dropped (RAII
/// pattern). This ensures the lock is always released, even if the run
/// panics.
#[derive(Debug)]
pub struct RunLock {
    /// Path to the lock file.
    path: PathBuf,
    /// The open file handle with the lock held.
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl RunLock {
    /// Attempt to acquire the run lock for a repository root.
    ///
    /// Uses OS-level file locking via `fs2`, which works across processes.
    /// Non-blocking: if another process holds the lock this returns
    /// [`LockError::AlreadyLocked`] immediately.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(repository_root: &Path) -> Result<Self, LockError> {
        let path = repository_root.join(LOCK_FILE_NAME);

        // Open or create the lock file
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        // Try to acquire an exclusive lock (non-blocking)
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Try to acquire the lock, returning `None` if already held elsewhere.
    pub fn try_acquire(repository_root: &Path) -> Result<Option<Self>, LockError> {
        match Self::acquire(repository_root) {
            Ok(lock) => Ok(Some(lock)),
            Err(LockError::AlreadyLocked) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check whether this guard currently holds the lock.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    ///
    /// Usually unnecessary; dropping the guard releases the lock.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            // Errors on unlock are not actionable here; dropping the handle
            // releases the OS lock regardless.
            let _ = fs2::FileExt::unlock(&file);
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let lock = RunLock::acquire(dir.path()).unwrap();
        assert!(lock.is_held());
        drop(lock);

        // Re-acquirable after release
        let again = RunLock::acquire(dir.path()).unwrap();
        assert!(again.is_held());
    }

    #[test]
    fn second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let _lock = RunLock::acquire(dir.path()).unwrap();

        match RunLock::acquire(dir.path()) {
            Err(LockError::AlreadyLocked) => {}
            other => panic!("expected AlreadyLocked, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn try_acquire_returns_none_when_held() {
        let dir = TempDir::new().unwrap();
        let _lock = RunLock::acquire(dir.path()).unwrap();
        assert!(RunLock::try_acquire(dir.path()).unwrap().is_none());
    }

    #[test]
    fn explicit_release_allows_reacquire() {
        let dir = TempDir::new().unwrap();
        let mut lock = RunLock::acquire(dir.path()).unwrap();
        lock.release();
        assert!(!lock.is_held());
        assert!(RunLock::acquire(dir.path()).is_ok());
    }
}
