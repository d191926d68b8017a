//! Error types for the webvh server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::BadRequest(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

impl From<webvh_crypto::ResourceError> for AppError {
    fn from(err: webvh_crypto::ResourceError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
