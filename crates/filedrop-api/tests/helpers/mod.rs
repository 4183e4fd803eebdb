//! Test helpers: build a router over temporary directories.
//!
//! Run from workspace root: `cargo test -p filedrop-api`.

#![allow(dead_code)]

use axum_test::multipart::Part;
use axum_test::TestServer;
use filedrop_api::setup::routes;
use filedrop_api::AppState;
use filedrop_core::{Config, ExtensionMatch, PrefixMode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Test application: server plus the directories it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub config: Config,
    pub _root: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn uploads(&self) -> &Path {
        &self.config.destination_dir
    }

    pub fn staging(&self) -> PathBuf {
        self.config
            .upload_temp_dir
            .clone()
            .expect("test config sets a staging dir")
    }

    /// Names of the entries in `dir`, sorted.
    pub fn list(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read dir")
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn test_config(root: &Path) -> Config {
    Config {
        server_port: 4000,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        field_name: "f".to_string(),
        destination_dir: root.join("uploads"),
        destination_prefix: String::new(),
        prefix_mode: PrefixMode::Static,
        allowed_extensions: vec!["jpg".to_string(), "png".to_string(), "gif".to_string()],
        extension_match: ExtensionMatch::CaseSensitive,
        allow_overwrite: false,
        max_file_size_bytes: 1024 * 1024,
        upload_temp_dir: Some(root.join("staging")),
        public_base_url: "http://localhost:4000/files".to_string(),
        serve_files: true,
        debug_trace: false,
        log_format: "compact".to_string(),
    }
}

/// Setup test app with default config.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

/// Setup test app after adjusting the default test config.
pub fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = test_config(root.path());
    customize(&mut config);

    std::fs::create_dir_all(&config.destination_dir).expect("Failed to create uploads dir");
    if let Some(staging) = &config.upload_temp_dir {
        std::fs::create_dir_all(staging).expect("Failed to create staging dir");
    }

    let state = Arc::new(AppState::new(config.clone()));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        config,
        _root: root,
    }
}

/// File part for the upload field.
pub fn file_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}
