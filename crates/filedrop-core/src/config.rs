//! Configuration module
//!
//! Settings are read from the environment (optionally seeded from a `.env`
//! file) with defaults for everything except production-only constraints.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_DESTINATION_DIR, DEFAULT_FIELD_NAME,
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PORT, TIMESTAMP_PREFIX_FORMAT,
};
use crate::models::{DestinationSpec, ExtensionMatch};

/// How the destination prefix is produced for each upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixMode {
    /// Use `DESTINATION_PREFIX` verbatim.
    #[default]
    Static,
    /// Use the current UTC time as an all-digit prefix, which replaces the
    /// original base name.
    Timestamp,
}

impl FromStr for PrefixMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(PrefixMode::Static),
            "timestamp" => Ok(PrefixMode::Timestamp),
            _ => Err(anyhow::anyhow!("Invalid prefix mode: {}", s)),
        }
    }
}

impl Display for PrefixMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PrefixMode::Static => write!(f, "static"),
            PrefixMode::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Multipart field that carries the file.
    pub field_name: String,
    pub destination_dir: PathBuf,
    pub destination_prefix: String,
    pub prefix_mode: PrefixMode,
    /// Extensions without a leading dot.
    pub allowed_extensions: Vec<String>,
    pub extension_match: ExtensionMatch,
    pub allow_overwrite: bool,
    pub max_file_size_bytes: usize,
    /// Staging directory for incoming bytes. `None` uses the OS temp dir.
    pub upload_temp_dir: Option<PathBuf>,
    pub public_base_url: String,
    pub serve_files: bool,
    pub debug_trace: bool,
    pub log_format: String,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .to_lowercase()
        .parse()
        .unwrap_or(default)
}

/// Split a comma separated extension list, dropping blanks and leading dots.
pub fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `MAX_FILE_SIZE_MB` into a byte count.
pub fn parse_max_file_size(raw: &str) -> Result<usize, anyhow::Error> {
    let megabytes: usize = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a whole number, got '{}'", raw))?;

    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", megabytes))
}

fn is_safe_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let max_file_size_bytes = match env::var("MAX_FILE_SIZE_MB") {
            Ok(raw) => parse_max_file_size(&raw)?,
            Err(_) => DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
        };

        let prefix_mode = match env::var("DESTINATION_PREFIX_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => PrefixMode::default(),
        };

        let extension_match = match env::var("EXTENSION_MATCH") {
            Ok(raw) => raw.parse()?,
            Err(_) => ExtensionMatch::default(),
        };

        let config = Config {
            server_port,
            environment,
            cors_origins,
            field_name: env::var("UPLOAD_FIELD_NAME")
                .unwrap_or_else(|_| DEFAULT_FIELD_NAME.to_string()),
            destination_dir: env::var("DESTINATION_DIR")
                .unwrap_or_else(|_| DEFAULT_DESTINATION_DIR.to_string())
                .into(),
            destination_prefix: env::var("DESTINATION_PREFIX").unwrap_or_default(),
            prefix_mode,
            allowed_extensions: parse_extension_list(
                &env::var("ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            extension_match,
            allow_overwrite: env_flag("ALLOW_OVERWRITE", false),
            max_file_size_bytes,
            upload_temp_dir: env::var("UPLOAD_TEMP_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("http://localhost:{}/files", server_port)),
            serve_files: env_flag("SERVE_FILES", true),
            debug_trace: env_flag("DEBUG_TRACE", false),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.field_name.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_FIELD_NAME must not be empty"));
        }

        if self.destination_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("DESTINATION_DIR must not be empty"));
        }

        if !self.destination_prefix.chars().all(is_safe_name_char) {
            return Err(anyhow::anyhow!(
                "DESTINATION_PREFIX may only contain letters, digits, '.', '-' and '_'"
            ));
        }

        if let Some(bad) = self
            .allowed_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(['.', '/', '\\']))
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS contains an invalid entry: '{}'",
                bad
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Debug traces are never returned to clients in production.
    pub fn debug_trace_enabled(&self) -> bool {
        self.debug_trace && !self.is_production()
    }

    /// Prefix for an upload arriving now.
    pub fn resolve_prefix(&self) -> String {
        match self.prefix_mode {
            PrefixMode::Static => self.destination_prefix.clone(),
            PrefixMode::Timestamp => chrono::Utc::now()
                .format(TIMESTAMP_PREFIX_FORMAT)
                .to_string(),
        }
    }

    /// Destination for an upload arriving now.
    pub fn destination_spec(&self) -> DestinationSpec {
        DestinationSpec {
            directory: self.destination_dir.clone(),
            prefix: self.resolve_prefix(),
            allowed_extensions: self.allowed_extensions.clone(),
            extension_match: self.extension_match,
            allow_overwrite: self.allow_overwrite,
        }
    }

    /// Public URL under which a stored file is reachable.
    pub fn public_url(&self, final_file_name: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            final_file_name
        )
    }
}
