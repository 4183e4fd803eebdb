//! Filedrop API Library
//!
//! HTTP boundary for the upload pipeline: multipart decoding, JSON responses,
//! static file serving, health checks and application setup.

pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use error::{HttpUploadError, UploadResponse};
pub use state::AppState;
