//! Defaults shared by configuration and the HTTP boundary.

/// Multipart field carrying the file when `UPLOAD_FIELD_NAME` is unset.
pub const DEFAULT_FIELD_NAME: &str = "f";

pub const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,gif,webp";

pub const DEFAULT_DESTINATION_DIR: &str = "./uploads";

pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 10;

pub const DEFAULT_PORT: u16 = 4000;

/// Content type reported when the client sends none.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// chrono format used by the `timestamp` prefix mode. Digits only, so the
/// prefix replaces the original base name.
pub const TIMESTAMP_PREFIX_FORMAT: &str = "%Y%m%d%H%M%S";
