//! Multipart intake for the upload handler.
//!
//! The configured field is streamed chunk by chunk into a staging file. Any
//! transport problem is reported through [`UploadStatus`] so the pipeline
//! produces the same response it would for other rejections.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use filedrop_core::constants::FALLBACK_CONTENT_TYPE;
use filedrop_core::{UploadError, UploadRequest, UploadStatus};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::constants::STAGING_FILE_PREFIX;

/// A received upload and the staging file holding its bytes.
pub struct StagedUpload {
    pub request: UploadRequest,
    /// Dropping it deletes the bytes unless the pipeline already moved them.
    /// `None` when the transport failed before anything was staged.
    pub temp_file: Option<NamedTempFile>,
}

impl StagedUpload {
    fn failed(
        field_name: &str,
        file_name: String,
        mime_type: String,
        status: UploadStatus,
    ) -> Self {
        StagedUpload {
            request: UploadRequest {
                field_name: field_name.to_string(),
                temp_file_path: PathBuf::new(),
                original_file_name: file_name,
                declared_mime_type: mime_type,
                declared_size: 0,
                upload_status: status,
            },
            temp_file: None,
        }
    }
}

/// Map a multipart decoding error onto a transport status.
fn status_for(error: &MultipartError) -> UploadStatus {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadStatus::SizeExceeded
    } else {
        UploadStatus::Partial
    }
}

/// Find the field named `field_name` and stage its content under `temp_dir`.
///
/// Other fields, and text fields sharing the name, are skipped. Returns
/// [`UploadError::MissingField`] when the form has no such file field at all.
pub async fn receive_upload(
    multipart: &mut Multipart,
    field_name: &str,
    temp_dir: &Path,
    max_size: usize,
) -> Result<StagedUpload, UploadError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(UploadError::MissingField {
                    field: field_name.to_string(),
                })
            }
            Err(e) => {
                tracing::debug!(error = %e, "Multipart stream ended unexpectedly");
                return Ok(StagedUpload::failed(
                    field_name,
                    String::new(),
                    String::new(),
                    status_for(&e),
                ));
            }
        };

        if field.name() != Some(field_name) {
            tracing::debug!(field = ?field.name(), "Skipping unrelated form field");
            continue;
        }

        // A part without a filename is a plain text field, not a file input.
        if field.file_name().is_none() {
            tracing::debug!(field = field_name, "Skipping text field with upload field name");
            continue;
        }

        return Ok(stage_field(field, field_name, temp_dir, max_size).await);
    }
}

async fn stage_field(
    mut field: Field<'_>,
    field_name: &str,
    temp_dir: &Path,
    max_size: usize,
) -> StagedUpload {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let mime_type = field
        .content_type()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();

    let failed = |status| {
        StagedUpload::failed(field_name, file_name.clone(), mime_type.clone(), status)
    };

    if file_name.is_empty() {
        return failed(UploadStatus::NoFile);
    }

    let staged = tempfile::Builder::new()
        .prefix(STAGING_FILE_PREFIX)
        .tempfile_in(temp_dir)
        .and_then(|temp| Ok((temp.reopen()?, temp)));
    let (std_file, temp_file) = match staged {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(
                temp_dir = %temp_dir.display(),
                error = %e,
                "Cannot create staging file"
            );
            return failed(UploadStatus::ServerError);
        }
    };

    let mut out = tokio::fs::File::from_std(std_file);
    let mut received: u64 = 0;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, received, "Upload body interrupted");
                return failed(status_for(&e));
            }
        };

        received += chunk.len() as u64;
        if received > max_size as u64 {
            return failed(UploadStatus::SizeExceeded);
        }

        if let Err(e) = out.write_all(&chunk).await {
            tracing::error!(error = %e, "Cannot write staging file");
            return failed(UploadStatus::ServerError);
        }
    }

    if let Err(e) = out.flush().await {
        tracing::error!(error = %e, "Cannot flush staging file");
        return failed(UploadStatus::ServerError);
    }

    tracing::debug!(
        file_name = %file_name,
        size_bytes = received,
        temp_path = %temp_file.path().display(),
        "Upload staged"
    );

    StagedUpload {
        request: UploadRequest {
            field_name: field_name.to_string(),
            temp_file_path: temp_file.path().to_path_buf(),
            original_file_name: file_name,
            declared_mime_type: mime_type,
            declared_size: received,
            upload_status: UploadStatus::Ok,
        },
        temp_file: Some(temp_file),
    }
}
