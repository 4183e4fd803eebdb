//! Upload validation and safe naming.
//!
//! [`UploadProcessor`] turns an untrusted [`filedrop_core::UploadRequest`] into
//! either a stored file or the reason it was refused. Name handling lives in
//! [`filename`], the allow-list in [`validator`].

pub mod filename;
pub mod upload;
pub mod validator;

pub use filename::{sanitize_filename, split_extension, SplitName};
pub use upload::UploadProcessor;
pub use validator::ExtensionPolicy;
