//! OAuth refresh grant against the Google token endpoint.

use cloudcode_types::models::{OAuthClientConfig, TokenRefreshResponse};
use reqwest::header;
use url::form_urlencoded;

use crate::error::{body_preview, AppError, AppResult};

/// Exchange `refresh_token` for a fresh access token.
pub async fn refresh_access_token(
    http: &reqwest::Client,
    client: &OAuthClientConfig,
    refresh_token: &str,
) -> AppResult<TokenRefreshResponse> {
    if refresh_token.trim().is_empty() {
        return Err(AppError::Refresh("no refresh token available".to_string()));
    }

    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &client.client_id)
        .append_pair("client_secret", &client.client_secret)
        .append_pair("refresh_token", refresh_token)
        .append_pair("grant_type", "refresh_token")
        .finish();

    let response = http
        .post(&client.token_url)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::ACCEPT, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::Refresh(format!("token endpoint unreachable: {}", e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Refresh(format!("failed to read token response: {}", e)))?;

    if !status.is_success() {
        return Err(AppError::Refresh(format!("token endpoint returned {}: {}", status, body_preview(&text))));
    }

    serde_json::from_str(&text)
        .map_err(|e| AppError::Refresh(format!("invalid token response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OAuthClientConfig {
        OAuthClientConfig {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            token_url: format!("{}/token", server.uri()),
        }
    }

    #[tokio::test]
    async fn test_refresh_posts_form_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=r-1"))
            .and(body_string_contains("client_id=cid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resp = refresh_access_token(&reqwest::Client::new(), &client_for(&server), "r-1")
            .await
            .unwrap();
        assert_eq!(resp.access_token, "new-token");
        assert_eq!(resp.expires_in, Some(3599));
        assert!(resp.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_refresh_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"error\":\"invalid_grant\"}"))
            .mount(&server)
            .await;

        let err = refresh_access_token(&reqwest::Client::new(), &client_for(&server), "r-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Refresh(ref m) if m.contains("invalid_grant")));
    }

    #[tokio::test]
    async fn test_missing_refresh_token() {
        let err = refresh_access_token(&reqwest::Client::new(), &OAuthClientConfig::default(), " ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Refresh(_)));
    }
}
