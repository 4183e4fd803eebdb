//! Route configuration and setup.
//!
//! The upload endpoint lives in [`crate::handlers::upload`]; health checks in
//! [health](health).

mod health;

use crate::constants::{
    FILES_PATH, HEALTH_PATH, MULTIPART_OVERHEAD_BYTES, READY_PATH, UPLOAD_PATH,
};
use crate::handlers::upload::{method_not_allowed, upload_file};
use crate::middleware::security_headers::{security_headers_middleware, SecurityHeadersConfig};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use filedrop_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config
        .max_file_size_bytes
        .checked_add(MULTIPART_OVERHEAD_BYTES)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;
    tracing::info!(
        max_file_size_bytes = config.max_file_size_bytes,
        body_limit_bytes = body_limit,
        "Upload body limit configured"
    );

    let upload_routes = Router::new()
        .route(UPLOAD_PATH, post(upload_file).fallback(method_not_allowed))
        .layer(DefaultBodyLimit::max(body_limit));

    let health_routes = Router::new()
        .route(HEALTH_PATH, get(health::liveness_check))
        .route(READY_PATH, get(health::readiness_check));

    let mut app = upload_routes.merge(health_routes).with_state(state);

    if config.serve_files {
        tracing::info!(
            path = FILES_PATH,
            directory = %config.destination_dir.display(),
            "Serving stored files"
        );
        app = app.nest_service(FILES_PATH, ServeDir::new(&config.destination_dir));
    }

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS_ORIGINS entry: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
