//! Error types module
//!
//! Every way an upload can fail is a variant of [`UploadError`]. All variants are
//! terminal for the request and their display text is the reason sent back to
//! the client. [`ErrorMetadata`] lets the HTTP layer pick a status code and log
//! level without matching on variants itself.

use std::io;
use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for conflicts and transport hiccups
    Warn,
    /// Error level - for server-side failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NAME_CONFLICT")
    fn error_code(&self) -> &'static str;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failures detected by the transport before the file reached the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransportFailure {
    #[error("File too big!")]
    SizeExceeded,

    #[error("Incomplete upload, please retry.")]
    Partial,

    #[error("No file! Give a file in the upload field...")]
    NoFile,

    /// Temp storage missing or not writable.
    #[error("Bad server config! Sorry...")]
    ServerError,

    #[error("Bad file extension.")]
    ExtensionBlocked,

    #[error("Error when uploading: {0}")]
    Unknown(u16),
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    #[error("File is empty!")]
    EmptyFile,

    #[error("File format not allowed.")]
    ExtensionNotAllowed { extension: String },

    #[error("Invalid file name.")]
    InvalidFileName { name: String },

    #[error("File already exists in: {}", path.display())]
    NameConflict { path: PathBuf },

    #[error("Failed to move uploaded file: {}", path.display())]
    MoveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Field not found")]
    MissingField { field: String },

    #[error("Request must be done via POST")]
    MethodNotAllowed,
}

impl UploadError {
    /// Get a string representation of the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            UploadError::Transport(_) => "transport",
            UploadError::EmptyFile => "empty_file",
            UploadError::ExtensionNotAllowed { .. } => "extension_not_allowed",
            UploadError::InvalidFileName { .. } => "invalid_file_name",
            UploadError::NameConflict { .. } => "name_conflict",
            UploadError::MoveFailed { .. } => "move_failed",
            UploadError::MissingField { .. } => "missing_field",
            UploadError::MethodNotAllowed => "method_not_allowed",
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn upload_error_static_metadata(err: &UploadError) -> (u16, &'static str, LogLevel) {
    match err {
        UploadError::Transport(failure) => match failure {
            TransportFailure::SizeExceeded => (413, "FILE_TOO_LARGE", LogLevel::Debug),
            TransportFailure::Partial => (400, "PARTIAL_UPLOAD", LogLevel::Warn),
            TransportFailure::NoFile => (400, "NO_FILE", LogLevel::Debug),
            TransportFailure::ServerError => (500, "SERVER_MISCONFIGURED", LogLevel::Error),
            TransportFailure::ExtensionBlocked => (415, "EXTENSION_BLOCKED", LogLevel::Debug),
            TransportFailure::Unknown(_) => (500, "UNKNOWN_UPLOAD_ERROR", LogLevel::Error),
        },
        UploadError::EmptyFile => (400, "EMPTY_FILE", LogLevel::Debug),
        UploadError::ExtensionNotAllowed { .. } => {
            (415, "EXTENSION_NOT_ALLOWED", LogLevel::Debug)
        }
        UploadError::InvalidFileName { .. } => (400, "INVALID_FILE_NAME", LogLevel::Debug),
        UploadError::NameConflict { .. } => (409, "NAME_CONFLICT", LogLevel::Warn),
        UploadError::MoveFailed { .. } => (500, "MOVE_FAILED", LogLevel::Error),
        UploadError::MissingField { .. } => (400, "MISSING_FIELD", LogLevel::Debug),
        UploadError::MethodNotAllowed => (405, "METHOD_NOT_ALLOWED", LogLevel::Debug),
    }
}

impl ErrorMetadata for UploadError {
    fn http_status_code(&self) -> u16 {
        upload_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        upload_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        upload_error_static_metadata(self).2
    }
}
