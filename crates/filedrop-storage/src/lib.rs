//! Filedrop Storage Library
//!
//! This crate provides the [`FileStore`] abstraction the upload pipeline uses to
//! touch the filesystem, and [`LocalStorage`], its local-disk implementation.
//!
//! Stores never decide *where* a file goes; callers pass fully resolved paths.
//! What a store guarantees is that [`FileStore::persist`] either places the
//! complete file at the destination or leaves the destination untouched.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{FileStore, PersistMode, StorageError, StorageResult};
