//! Route paths and HTTP limits.

pub const UPLOAD_PATH: &str = "/upload";

/// Stored files are served under this prefix when `SERVE_FILES` is on.
pub const FILES_PATH: &str = "/files";

pub const HEALTH_PATH: &str = "/health";

pub const READY_PATH: &str = "/health/ready";

/// Headroom on top of `MAX_FILE_SIZE_MB` for multipart boundaries, part
/// headers and small extra fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Name prefix of staging files created while a request body is received.
pub const STAGING_FILE_PREFIX: &str = "upload-";

pub const DEFAULT_LOG_FILTER: &str = "filedrop=debug,tower_http=debug";
