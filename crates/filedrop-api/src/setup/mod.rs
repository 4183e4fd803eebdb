//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use filedrop_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub fn initialize_app(mut config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(&config.log_format)
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    // Directories must exist before the first request arrives
    storage::setup_storage(&mut config)?;

    let state = Arc::new(AppState::new(config));

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
