//! Unified error types for CloudCode Core.

use cloudcode_types::{ConfigError, TranslateError};
use serde::Serialize;
use thiserror::Error;

/// Maximum number of upstream body bytes kept in error messages.
pub const BODY_PREVIEW_LIMIT: usize = 1024;

/// Non-200 answer from one CloudCode endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("upstream {endpoint} returned {status} ({content_type}): {}", body_preview(.body))]
pub struct UpstreamError {
    pub status: u16,
    pub body: String,
    pub content_type: String,
    pub endpoint: String,
}

impl UpstreamError {
    /// Body truncated to [`BODY_PREVIEW_LIMIT`] bytes, `...` appended when cut.
    pub fn preview(&self) -> String {
        body_preview(&self.body)
    }
}

pub(crate) fn body_preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW_LIMIT {
        return body.to_string();
    }
    let mut end = BODY_PREVIEW_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Main error type for all gateway operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Credential provider returned a blank access token.
    #[error("access token is empty")]
    EmptyToken,

    /// Credential provider could not produce credentials.
    #[error("Credential error: {0}")]
    Credentials(String),

    /// OAuth token refresh failed.
    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// Endpoint answered with a non-200 status.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Connection-level failure against one endpoint.
    #[error("Transport error at {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// Endpoint list is empty.
    #[error("no upstream endpoints configured")]
    NoEndpoints,

    /// Onboarding finished without a companion project id.
    #[error("onboarding completed but no project ID found")]
    OnboardingIncomplete,

    /// Client request could not be translated.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// Network request failed outside the failover loop.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Result type alias for gateway operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_preview_is_bounded() {
        let err = UpstreamError {
            status: 500,
            body: "x".repeat(5000),
            content_type: "text/plain".to_string(),
            endpoint: "https://a".to_string(),
        };
        let preview = err.preview();
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
        assert!(preview.ends_with("..."));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("https://a"));
    }

    #[test]
    fn test_body_preview_respects_char_boundaries() {
        let body = "é".repeat(600);
        let preview = body_preview(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_short_body_untouched() {
        assert_eq!(body_preview("nope"), "nope");
    }
}
