//! `POST /upload`

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use filedrop_core::{TransportFailure, UploadError, UploadTrace};
use tempfile::NamedTempFile;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{HttpUploadError, UploadResponse};
use crate::state::AppState;
use crate::utils::upload::{receive_upload, StagedUpload};

/// Receive one file, run it through the pipeline and report the outcome.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload_id = Uuid::new_v4();
    let span = tracing::info_span!("upload", %upload_id);

    async move {
        match handle_upload(&state, multipart).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}

async fn handle_upload(
    state: &Arc<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpUploadError> {
    let config = &state.config;

    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Request is not multipart");
        UploadError::MissingField {
            field: config.field_name.clone(),
        }
    })?;

    let temp_dir = config
        .upload_temp_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    let StagedUpload { request, temp_file } = receive_upload(
        &mut multipart,
        &config.field_name,
        &temp_dir,
        config.max_file_size_bytes,
    )
    .await?;

    let spec = config.destination_spec();
    let processor = state.processor.clone();

    // temp_file travels with the job so the staged bytes outlive processing.
    let (result, trace, temp_file) = tokio::task::spawn_blocking(move || {
        let mut trace = UploadTrace::new();
        let result = processor.process(&request, &spec, &mut trace);
        (result, trace, temp_file)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Upload task failed");
        UploadError::from(TransportFailure::ServerError)
    })?;

    let debug = config
        .debug_trace_enabled()
        .then(|| trace.into_entries());

    match result {
        Ok(stored) => {
            if let Some(temp_file) = temp_file {
                release_moved(temp_file);
            }

            let file_location = config.public_url(&stored.final_file_name);
            tracing::info!(
                file_name = %stored.final_file_name,
                mime_type = %stored.mime_type,
                location = %file_location,
                "Upload completed"
            );

            Ok((
                StatusCode::OK,
                Json(UploadResponse::stored(file_location, debug)),
            )
                .into_response())
        }
        Err(e) => Err(HttpUploadError::from(e).with_debug(debug)),
    }
}

/// The bytes were moved into place; disarm the handle so dropping it leaves
/// the old staging path alone. A staging file still on disk (the storage
/// layer could not unlink it) is dropped and removed here instead.
fn release_moved(temp_file: NamedTempFile) {
    if temp_file.path().exists() {
        tracing::debug!(
            temp_path = %temp_file.path().display(),
            "Staging file left behind after persist, removing"
        );
        return;
    }

    if let Err(e) = temp_file.into_temp_path().keep() {
        tracing::debug!(error = %e, "Staging handle could not be released");
    }
}

/// Any method other than POST on `/upload`.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        [(header::ALLOW, "POST")],
        HttpUploadError::from(UploadError::MethodNotAllowed),
    )
}
