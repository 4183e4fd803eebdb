//! Application state shared by all handlers.

use filedrop_core::Config;
use filedrop_processing::UploadProcessor;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub processor: UploadProcessor,
}

impl AppState {
    /// State backed by the local filesystem.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            processor: UploadProcessor::local(),
        }
    }
}
