//! Upload pipeline: status → size → name → extension → collision → persist.

mod pipeline;

pub use pipeline::UploadProcessor;
