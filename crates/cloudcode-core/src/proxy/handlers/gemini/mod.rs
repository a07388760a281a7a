//! Gemini-style `models/{model}:{action}` handlers.

mod streaming;

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use cloudcode_types::protocol::GenerateContentRequest;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::info;

use super::errors::ApiError;
use crate::proxy::mappers::gemini::parse_internal_request;
use crate::proxy::server::AppState;

pub const GENERATE_CONTENT: &str = "generateContent";
pub const STREAM_GENERATE_CONTENT: &str = "streamGenerateContent";

static MODEL_ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"v1(?:beta)?/models/([^/:]+):(.+)$").expect("Model action regex is valid")
});

/// Split `.../v1beta/models/{model}:{action}` into `(model, action)`.
pub fn parse_model_action(path: &str) -> Option<(String, String)> {
    let caps = MODEL_ACTION_RE.captures(path)?;
    Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
}

pub async fn handle_generate(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Some((model, action)) = parse_model_action(uri.path()) else {
        return Err(ApiError::not_found(format!("No model action in path {}", uri.path())));
    };
    let stream = match action.as_str() {
        GENERATE_CONTENT => false,
        STREAM_GENERATE_CONTENT => true,
        other => return Err(ApiError::not_found(format!("Unsupported action: {}", other))),
    };

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_request(format!("Invalid JSON body: {}", e)))?;
    let inner = parse_internal_request(&raw).map_err(crate::error::AppError::from)?;

    info!(model = %model, action = %action, "Gemini request");

    let project = state.resolver.project_id().await?;
    let request = GenerateContentRequest::new(model, project, inner);

    if stream {
        return streaming::stream_generate(&state, request).await;
    }
    let response = state.upstream.generate_content(request).await?;
    Ok(Json(response).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_action() {
        assert_eq!(
            parse_model_action("/v1beta/models/gemini-3-pro:streamGenerateContent"),
            Some(("gemini-3-pro".to_string(), STREAM_GENERATE_CONTENT.to_string()))
        );
        assert_eq!(
            parse_model_action("/v1/models/claude-sonnet-4-5:generateContent"),
            Some(("claude-sonnet-4-5".to_string(), GENERATE_CONTENT.to_string()))
        );
        assert_eq!(parse_model_action("/v1beta/models/gemini-3-pro"), None);
        assert_eq!(parse_model_action("/v2/models/x:generateContent"), None);
    }
}
