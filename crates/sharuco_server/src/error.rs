//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sharuco_core::{writer::RETRY_MESSAGE, AppError};

/// Wrapper turning [`AppError`] into JSON error responses.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "Validation failed", "fields": errors.messages() }),
            ),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Authentication required" }),
            ),
            AppError::SubmissionInFlight => (
                StatusCode::CONFLICT,
                json!({ "error": "A submission is already in progress" }),
            ),
            AppError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Write(source) => {
                tracing::error!("Write error: {}", source);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": RETRY_MESSAGE }),
                )
            }
            AppError::Read { category, source } => {
                tracing::error!("Read error for {}: {}", category, source);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": category.failure_message() }),
                )
            }
            other => {
                tracing::error!("Internal error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
