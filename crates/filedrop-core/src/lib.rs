//! Filedrop Core Library
//!
//! This crate provides the upload data model, error types, configuration and the
//! diagnostic trace shared by the storage, processing and API crates.

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, PrefixMode};
pub use diagnostics::UploadTrace;
pub use error::{ErrorMetadata, LogLevel, TransportFailure, UploadError};
pub use models::{
    DestinationSpec, ExtensionMatch, StoredFile, UploadRequest, UploadResult, UploadStatus,
};
