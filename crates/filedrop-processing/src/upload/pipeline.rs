use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use filedrop_core::{
    DestinationSpec, StoredFile, TransportFailure, UploadError, UploadRequest, UploadResult,
    UploadTrace,
};
use filedrop_storage::{FileStore, LocalStorage, PersistMode, StorageError};

use crate::filename::{
    destination_file_name, is_storable_name, normalize_directory, sanitize_filename,
    split_extension,
};
use crate::validator::ExtensionPolicy;

/// Validates one upload and moves it into its destination.
///
/// Every step is a hard gate: the first failing check ends the call and the
/// temp file is left where it was for the caller to clean up.
#[derive(Clone)]
pub struct UploadProcessor {
    store: Arc<dyn FileStore>,
}

impl UploadProcessor {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Processor backed by the local filesystem.
    pub fn local() -> Self {
        Self::new(Arc::new(LocalStorage::new()))
    }

    /// Run the pipeline for a single request. Blocking.
    pub fn process(
        &self,
        request: &UploadRequest,
        spec: &DestinationSpec,
        trace: &mut UploadTrace,
    ) -> UploadResult {
        let start = Instant::now();

        trace.record(format!(
            "Field '{}': name={:?} type={:?} declared_size={} status={:?}",
            request.field_name,
            request.original_file_name,
            request.declared_mime_type,
            request.declared_size,
            request.upload_status
        ));

        if let Some(failure) = request.upload_status.failure() {
            trace.record(format!("Rejected by transport: {}", failure));
            return Err(failure.into());
        }

        let size = self
            .store
            .content_length(&request.temp_file_path)
            .map_err(|e| {
                tracing::error!(
                    temp_path = %request.temp_file_path.display(),
                    error = %e,
                    "Cannot read size of staged upload"
                );
                trace.record("Staged upload is unreadable");
                UploadError::from(TransportFailure::ServerError)
            })?;
        trace.record(format!("Real size: {} bytes", size));
        if size == 0 {
            return Err(UploadError::EmptyFile);
        }

        let sanitized = sanitize_filename(&request.original_file_name);
        let split = split_extension(&sanitized);
        trace.record(format!(
            "Sanitized name: {:?} (base={:?}, extension={:?})",
            sanitized, split.base, split.extension
        ));

        let policy = ExtensionPolicy::new(&spec.allowed_extensions, spec.extension_match);
        if let Err(e) = policy.validate(&split.extension) {
            trace.record(format!(
                "Extension {:?} not in {:?} ({})",
                split.extension, spec.allowed_extensions, spec.extension_match
            ));
            return Err(e);
        }

        let final_file_name = destination_file_name(&spec.prefix, &split);
        if !is_storable_name(&final_file_name) {
            trace.record(format!("Unusable destination name {:?}", final_file_name));
            return Err(UploadError::InvalidFileName {
                name: final_file_name,
            });
        }

        let final_path = normalize_directory(&spec.directory).join(&final_file_name);
        trace.record(format!("Destination: {}", final_path.display()));

        let taken = self
            .store
            .exists(&final_path)
            .map_err(|e| into_upload_error(e, &final_path))?;
        if taken && !spec.allow_overwrite {
            trace.record("Destination taken and overwrite disabled");
            return Err(UploadError::NameConflict { path: final_path });
        }

        let mode = if spec.allow_overwrite {
            PersistMode::Overwrite
        } else {
            PersistMode::NoClobber
        };

        if let Err(e) = self
            .store
            .persist(&request.temp_file_path, &final_path, mode)
        {
            trace.record(format!("Persist failed: {}", e));
            return Err(into_upload_error(e, &final_path));
        }

        trace.record(format!("Stored {} bytes as {}", size, final_file_name));
        tracing::info!(
            file_name = %final_file_name,
            path = %final_path.display(),
            size_bytes = size,
            replaced = taken,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(StoredFile {
            final_file_name,
            final_path,
            mime_type: request.declared_mime_type.clone(),
        })
    }
}

fn into_upload_error(err: StorageError, path: &Path) -> UploadError {
    let path = path.to_path_buf();
    match err {
        StorageError::AlreadyExists(_) => UploadError::NameConflict { path },
        StorageError::MoveFailed { source, .. } | StorageError::IoError(source) => {
            UploadError::MoveFailed { path, source }
        }
        other => UploadError::MoveFailed {
            path,
            source: io::Error::other(other.to_string()),
        },
    }
}
