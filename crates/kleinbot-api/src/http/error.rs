//! Application error type mapping to HTTP status codes.
//!
//! Bodies are plain text, which is what the messaging platform expects from
//! webhook endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug)]
pub enum AppError {
    /// Webhook subscription handshake rejected.
    VerificationFailed,
    /// Unsupported method on a webhook route.
    MethodNotAllowed,
    /// Unexpected failure (including a caught panic).
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::VerificationFailed => (StatusCode::FORBIDDEN, "Verification failed"),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        (status, body).into_response()
    }
}
