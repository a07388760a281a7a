use reqwest::header::{self, HeaderMap, HeaderValue};

use super::user_agent::platform_user_agent;
use crate::error::{AppError, AppResult};

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_EVENT_STREAM: &str = "text/event-stream";

const GOOG_API_CLIENT: &str = "google-cloud-sdk vscode_cloudshelleditor/0.1";
const CLIENT_METADATA: &str =
    r#"{"ideType":"IDE_UNSPECIFIED","platform":"PLATFORM_UNSPECIFIED","pluginType":"GEMINI"}"#;

/// `{endpoint}/v1internal:{method}` plus an optional query string.
pub fn build_url(endpoint: &str, method: &str, query_string: Option<&str>) -> String {
    match query_string {
        Some(qs) => format!("{}/v1internal:{}?{}", endpoint, method, qs),
        None => format!("{}/v1internal:{}", endpoint, method),
    }
}

/// Fixed header set sent with every CloudCode call.
pub fn build_headers(access_token: &str, accept: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", access_token)).map_err(|_| {
            AppError::Credentials("access token contains characters not allowed in headers".to_string())
        })?,
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_str(&platform_user_agent())
            .unwrap_or_else(|_| HeaderValue::from_static("antigravity")),
    );
    headers.insert("x-goog-api-client", HeaderValue::from_static(GOOG_API_CLIENT));
    headers.insert("client-metadata", HeaderValue::from_static(CLIENT_METADATA));
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_str(accept).unwrap_or_else(|_| HeaderValue::from_static(ACCEPT_JSON)),
    );
    Ok(headers)
}
