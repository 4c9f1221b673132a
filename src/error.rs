use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::inference::InferenceError;

/// Errors surfaced to HTTP callers as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Server-side misconfiguration (e.g. no API key).
    #[error("{0}")]
    Configuration(String),
    /// Bad client input: wrong content type, oversize upload, malformed multipart.
    #[error("{0}")]
    Validation(String),
    /// Uploaded bytes are not a decodable image.
    #[error("{0}")]
    Decode(String),
    /// The inference service call failed.
    #[error("image analysis service failed: {0}")]
    Service(#[from] InferenceError),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::Decode(_) => StatusCode::BAD_REQUEST,
            AppError::Service(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
