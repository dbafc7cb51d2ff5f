use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error returned by request handlers.
///
/// Operational errors are shown to the client as-is; anything else is logged
/// and answered with a generic 500 so internals never leak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub operational: bool,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
            operational: true,
        }
    }

    pub fn internal<S: Into<String>>(details: S) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: details.into(),
            operational: false,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.operational {
            let body = json!({ "status": "error", "message": self.message });
            return (self.status, Json(body)).into_response();
        }

        error!("Unhandled request error: {}", self.message);
        let body = json!({ "status": "error", "message": "Something went wrong" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
