//! Storage abstraction trait
//!
//! This module defines the FileStore trait the upload pipeline is written against.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What [`FileStore::persist`] does when the destination is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Atomically replace whatever is at the destination.
    Overwrite,
    /// Fail with [`StorageError::AlreadyExists`] if anything is at the
    /// destination at the moment of the move.
    NoClobber,
}

/// Filesystem operations needed by the upload pipeline.
///
/// Calls are blocking; async callers run them on a blocking thread.
pub trait FileStore: Send + Sync {
    /// Size in bytes of the file at `path`, read from the filesystem.
    fn content_length(&self, path: &Path) -> StorageResult<u64>;

    /// Whether any directory entry exists at `path`. Dangling symlinks count.
    fn exists(&self, path: &Path) -> StorageResult<bool>;

    /// Move `source` to `destination`.
    ///
    /// On success `source` no longer exists. On failure the destination is
    /// either untouched or, in `Overwrite` mode, still holds its previous
    /// content; it never holds a partially written file.
    fn persist(&self, source: &Path, destination: &Path, mode: PersistMode) -> StorageResult<()>;
}
