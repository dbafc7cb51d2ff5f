use super::error::ApiError;
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::error;

/// Liveness endpoint polled by the infrastructure health checks
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Always fails, for verifying error reporting end to end
pub async fn test_error_handler() -> Result<Json<Value>, ApiError> {
    error!("Test error endpoint triggered");
    Err(ApiError::internal(
        "This is a test error for error reporting verification",
    ))
}

pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        format!("Route {} not found", uri.path()),
    )
}
