//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are flat JSON: `{ "error": "..." }` for client errors and
//! `{ "error": "...", "details": "..." }` for server failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use colloquy_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Rejected input, reported as 400.
    BadRequest(String),
    /// Server-side failure, reported as 500 with the cause in `details`.
    Internal {
        message: &'static str,
        details: String,
    },
}

impl AppError {
    /// Map a `ChatError` from an endpoint whose server failures are
    /// reported as `failure_message`.
    pub fn from_chat(err: ChatError, failure_message: &'static str) -> Self {
        match err {
            ChatError::InvalidInput(msg) => AppError::BadRequest(msg),
            other => {
                tracing::error!(error = %other, "{failure_message}");
                AppError::Internal {
                    message: failure_message,
                    details: other.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
        }
    }
}
