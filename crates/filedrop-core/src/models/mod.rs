//! Upload data model.

pub mod upload;

pub use upload::{
    DestinationSpec, ExtensionMatch, StoredFile, UploadRequest, UploadResult, UploadStatus,
};
