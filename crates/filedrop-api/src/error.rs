//! HTTP response conversion
//!
//! Every upload outcome, success or failure, is rendered as an [`UploadResponse`]
//! body. Failures go through [`HttpUploadError`], which takes its status code
//! and log level from the error's [`ErrorMetadata`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filedrop_core::{ErrorMetadata, LogLevel, UploadError};
use serde::Serialize;

/// JSON envelope returned by `/upload`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Pipeline trace, only present when debug tracing is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
}

impl UploadResponse {
    pub fn stored(file_location: impl Into<String>, debug: Option<Vec<String>>) -> Self {
        Self {
            success: true,
            file_location: Some(file_location.into()),
            error: None,
            debug,
        }
    }

    pub fn failed(reason: impl Into<String>, debug: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            file_location: None,
            error: Some(reason.into()),
            debug,
        }
    }
}

/// Wrapper type for UploadError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for UploadError (external type from filedrop-core)
#[derive(Debug)]
pub struct HttpUploadError {
    pub error: UploadError,
    pub debug: Option<Vec<String>>,
}

impl HttpUploadError {
    pub fn with_debug(mut self, debug: Option<Vec<String>>) -> Self {
        self.debug = debug;
        self
    }
}

impl From<UploadError> for HttpUploadError {
    fn from(error: UploadError) -> Self {
        HttpUploadError { error, debug: None }
    }
}

fn log_error(error: &UploadError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Upload rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Upload rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = ?error, error_type, code, "Upload failed");
        }
    }
}

impl IntoResponse for HttpUploadError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.error);

        let body = UploadResponse::failed(self.error.client_message(), self.debug);
        (status, Json(body)).into_response()
    }
}
