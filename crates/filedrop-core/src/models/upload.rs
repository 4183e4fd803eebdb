//! Types describing one upload: what the transport handed over, where it should
//! go, and what ended up on disk.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TransportFailure, UploadError};

/// Outcome reported by the transport layer before any validation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Ok,
    SizeExceeded,
    Partial,
    NoFile,
    ServerError,
    ExtensionBlocked,
    /// A transport code this service does not know about.
    Unknown(u16),
}

impl UploadStatus {
    /// The transport failure behind this status, `None` for [`UploadStatus::Ok`].
    pub fn failure(self) -> Option<TransportFailure> {
        match self {
            UploadStatus::Ok => None,
            UploadStatus::SizeExceeded => Some(TransportFailure::SizeExceeded),
            UploadStatus::Partial => Some(TransportFailure::Partial),
            UploadStatus::NoFile => Some(TransportFailure::NoFile),
            UploadStatus::ServerError => Some(TransportFailure::ServerError),
            UploadStatus::ExtensionBlocked => Some(TransportFailure::ExtensionBlocked),
            UploadStatus::Unknown(code) => Some(TransportFailure::Unknown(code)),
        }
    }
}

/// A single incoming file as handed over by the HTTP boundary.
///
/// Everything except `temp_file_path` and `upload_status` comes from the client
/// and must be treated as untrusted.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub field_name: String,
    /// Transport-owned staging file holding the received bytes.
    pub temp_file_path: PathBuf,
    pub original_file_name: String,
    pub declared_mime_type: String,
    pub declared_size: u64,
    pub upload_status: UploadStatus,
}

/// How extensions are compared against the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionMatch {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl FromStr for ExtensionMatch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "case-sensitive" | "sensitive" => Ok(ExtensionMatch::CaseSensitive),
            "case-insensitive" | "insensitive" => Ok(ExtensionMatch::CaseInsensitive),
            _ => Err(anyhow::anyhow!("Invalid extension match mode: {}", s)),
        }
    }
}

impl Display for ExtensionMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtensionMatch::CaseSensitive => write!(f, "case-sensitive"),
            ExtensionMatch::CaseInsensitive => write!(f, "case-insensitive"),
        }
    }
}

/// Where and how a validated upload is stored. Immutable for one call.
#[derive(Debug, Clone)]
pub struct DestinationSpec {
    pub directory: PathBuf,
    /// Prepended verbatim to the base name. An all-digit prefix replaces the
    /// base name entirely.
    pub prefix: String,
    /// Extensions without a leading dot.
    pub allowed_extensions: Vec<String>,
    pub extension_match: ExtensionMatch,
    pub allow_overwrite: bool,
}

/// A file that was validated and moved into its final location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub final_file_name: String,
    pub final_path: PathBuf,
    /// Client-declared MIME type. Not checked against the content.
    pub mime_type: String,
}

pub type UploadResult = Result<StoredFile, UploadError>;
