use crate::traits::{FileStore, PersistMode, StorageError, StorageResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Mode given to stored files so a separate web server can read them.
#[cfg(unix)]
pub const STORED_FILE_MODE: u32 = 0o644;

/// Local filesystem storage implementation
#[derive(Clone, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }

    /// Create `dir` (and parents) if missing and return its canonical path.
    pub fn ensure_directory(dir: &Path) -> StorageResult<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let canonical = dir.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to canonicalize storage directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        if !canonical.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "Storage path {} is not a directory",
                canonical.display()
            )));
        }

        Ok(canonical)
    }

    /// Copy `source` into a hidden temp file next to `destination`, then rename
    /// it into place. The rename is what makes the file visible, so readers
    /// never observe a partial copy.
    fn stage_copy(source: &Path, destination: &Path, mode: PersistMode) -> io::Result<()> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut staged = tempfile::Builder::new()
            .prefix(".filedrop-")
            .tempfile_in(parent)?;

        let mut input = fs::File::open(source)?;
        io::copy(&mut input, staged.as_file_mut())?;
        staged.as_file().sync_all()?;

        match mode {
            PersistMode::Overwrite => staged.persist(destination),
            PersistMode::NoClobber => staged.persist_noclobber(destination),
        }
        .map(|_| ())
        .map_err(|e| e.error)
    }

    /// First attempt: a same-filesystem rename or hard link.
    fn direct_move(source: &Path, destination: &Path, mode: PersistMode) -> io::Result<()> {
        // hard_link refuses an existing destination atomically, which makes
        // NoClobber safe against a file appearing after the caller's check.
        match mode {
            PersistMode::Overwrite => fs::rename(source, destination),
            PersistMode::NoClobber => {
                fs::hard_link(source, destination).map(|()| Self::remove_source(source))
            }
        }
    }

    /// Staging files are created owner-only; widen the stored copy.
    #[cfg(unix)]
    fn publish(destination: &Path) {
        use std::os::unix::fs::PermissionsExt;

        let permissions = fs::Permissions::from_mode(STORED_FILE_MODE);
        if let Err(e) = fs::set_permissions(destination, permissions) {
            tracing::warn!(
                path = %destination.display(),
                error = %e,
                "Stored file permissions could not be updated"
            );
        }
    }

    #[cfg(not(unix))]
    fn publish(_destination: &Path) {}

    fn persist_with(
        source: &Path,
        destination: &Path,
        mode: PersistMode,
        direct: impl FnOnce(&Path, &Path, PersistMode) -> io::Result<()>,
    ) -> StorageResult<()> {
        let start = Instant::now();

        match direct(source, destination, mode) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists(destination.to_path_buf()));
            }
            Err(e) => {
                tracing::debug!(
                    from = %source.display(),
                    to = %destination.display(),
                    error = %e,
                    "Direct move failed, falling back to staged copy"
                );
                match Self::stage_copy(source, destination, mode) {
                    Ok(()) => Self::remove_source(source),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        return Err(StorageError::AlreadyExists(destination.to_path_buf()));
                    }
                    Err(e) => {
                        return Err(StorageError::MoveFailed {
                            from: source.to_path_buf(),
                            to: destination.to_path_buf(),
                            source: e,
                        });
                    }
                }
            }
        }

        Self::publish(destination);

        tracing::info!(
            from = %source.display(),
            to = %destination.display(),
            overwrite = mode == PersistMode::Overwrite,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage persist successful"
        );

        Ok(())
    }

    fn remove_source(source: &Path) {
        if let Err(e) = fs::remove_file(source) {
            tracing::warn!(
                path = %source.display(),
                error = %e,
                "File persisted but source could not be removed"
            );
        }
    }
}

impl FileStore for LocalStorage {
    fn content_length(&self, path: &Path) -> StorageResult<u64> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn exists(&self, path: &Path) -> StorageResult<bool> {
        match fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn persist(&self, source: &Path, destination: &Path, mode: PersistMode) -> StorageResult<()> {
        Self::persist_with(source, destination, mode, Self::direct_move)
    }
}
