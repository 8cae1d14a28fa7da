use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Location outside service region: {0}")]
    OutOfRegion(String),

    #[error("Routing provider error: {0}")]
    Provider(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidCoordinate(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::OutOfRegion(ref e) => (StatusCode::UNPROCESSABLE_ENTITY, e.as_str()),
            AppError::Provider(ref e) => {
                // Provider failures are recovered inside the resolver; reaching
                // here means a handler called the provider directly.
                tracing::error!("Routing provider error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
