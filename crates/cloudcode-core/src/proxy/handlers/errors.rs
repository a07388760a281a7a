//! Structured HTTP errors: `{"type":"error","error":{"type":...,"message":...}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AppError;

pub const INVALID_REQUEST: &str = "invalid_request_error";
pub const NOT_FOUND: &str = "not_found_error";
pub const AUTHENTICATION: &str = "authentication_error";
pub const API_ERROR: &str = "api_error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_type: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: &'static str, message: impl Into<String>) -> Self {
        Self { status, error_type, message: message.into() }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "type": "error",
            "error": { "type": self.error_type, "message": self.message }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let message = err.to_string();
        let mapped = match &err {
            AppError::Translate(_) => Self::invalid_request(message),
            AppError::Upstream(upstream) => Self::new(
                StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY),
                API_ERROR,
                message,
            ),
            AppError::Transport { .. } | AppError::Network(_) | AppError::Json(_) => {
                Self::new(StatusCode::BAD_GATEWAY, API_ERROR, message)
            },
            AppError::EmptyToken | AppError::Credentials(_) | AppError::Refresh(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, AUTHENTICATION, message)
            },
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, API_ERROR, message),
        };
        if mapped.status.is_server_error() {
            tracing::error!(status = mapped.status.as_u16(), error = %mapped.message, "Request failed");
        } else {
            tracing::warn!(status = mapped.status.as_u16(), error = %mapped.message, "Request rejected");
        }
        mapped
    }
}
