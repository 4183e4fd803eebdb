//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - destination directory is present.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let directory = &state.config.destination_dir;

    let storage = match tokio::fs::metadata(directory).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err("not a directory".to_string()),
        Err(e) => Err(e.to_string()),
    };

    match storage {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "storage": "ready" })),
        ),
        Err(reason) => {
            tracing::error!(
                path = %directory.display(),
                error = %reason,
                "Storage readiness check failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "storage": format!("not_ready: {}", reason)
                })),
            )
        }
    }
}
