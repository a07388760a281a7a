//! Authenticated CloudCode client with ordered endpoint failover.
//!
//! Every call walks the configured endpoints in order and stops at the first
//! `200`. A `401` triggers one credential refresh and one retry against the
//! same endpoint. Any other non-200 status, a transport failure, a failed
//! refresh or a second `401` moves on to the next endpoint. Only a missing or
//! blank token before the first request aborts the whole call.

pub mod request_executor;
mod streaming;
pub mod user_agent;


use bytes::Bytes;
use cloudcode_types::protocol::{
    FetchAvailableModelsResponse, GenerateContentRequest, LoadCodeAssistRequest,
    LoadCodeAssistResponse, OnboardOperation, OnboardUserRequest,
};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use self::request_executor::{build_headers, build_url, ACCEPT_EVENT_STREAM, ACCEPT_JSON};
use crate::error::{AppError, AppResult, UpstreamError};
use crate::proxy::credentials::CredentialProvider;
use crate::proxy::mappers::gemini::unwrap_response;
use crate::proxy::mappers::request_prep::prepare_request;

/// Outcome of one endpoint attempt that did not succeed.
enum AttemptError {
    /// Recorded; the next endpoint is tried.
    Soft(AppError),
    /// Ends the call immediately.
    Fatal(AppError),
}

pub struct UpstreamClient {
    http: Client,
    provider: Arc<dyn CredentialProvider>,
    endpoints: Vec<String>,
}

impl UpstreamClient {
    /// `endpoints` are base URLs such as `https://cloudcode-pa.googleapis.com`, in preference order.
    pub fn new(http: Client, provider: Arc<dyn CredentialProvider>, endpoints: Vec<String>) -> Self {
        let endpoints = endpoints
            .into_iter()
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self { http, provider, endpoints }
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn provider(&self) -> &Arc<dyn CredentialProvider> {
        &self.provider
    }

    /// Unary generation. The request is prepared first; the response comes back unwrapped.
    pub async fn generate_content(&self, mut request: GenerateContentRequest) -> AppResult<Value> {
        prepare_request(&mut request);
        tracing::debug!(
            model = %request.model,
            request_id = %request.request_id,
            session_id = request.request.session_id.as_deref().unwrap_or_default(),
            "Dispatching generateContent"
        );
        let raw: Value = self.call_json("generateContent", &request).await?;
        Ok(unwrap_response(raw))
    }

    /// Streaming generation.
    ///
    /// Returns once a live `200` body is open; a background task then forwards
    /// raw SSE lines into `tx` until the body ends or `cancel` fires.
    pub async fn stream_generate_content(
        &self,
        mut request: GenerateContentRequest,
        tx: mpsc::Sender<String>,
        cancel: CancellationToken,
    ) -> AppResult<JoinHandle<()>> {
        prepare_request(&mut request);
        tracing::debug!(
            model = %request.model,
            request_id = %request.request_id,
            "Dispatching streamGenerateContent"
        );
        let body = Bytes::from(serde_json::to_vec(&request)?);
        let response = self
            .failover("streamGenerateContent", Some("alt=sse"), &body, ACCEPT_EVENT_STREAM, |resp, _| {
                std::future::ready(Ok(resp))
            })
            .await?;
        Ok(tokio::spawn(streaming::forward_lines(response, tx, cancel)))
    }

    pub async fn load_code_assist(&self) -> AppResult<LoadCodeAssistResponse> {
        self.call_json("loadCodeAssist", &LoadCodeAssistRequest::default()).await
    }

    pub async fn onboard_user(&self, request: &OnboardUserRequest) -> AppResult<OnboardOperation> {
        self.call_json("onboardUser", request).await
    }

    pub async fn fetch_available_models(&self) -> AppResult<FetchAvailableModelsResponse> {
        self.call_json("fetchAvailableModels", &serde_json::json!({})).await
    }

    /// Unary call with failover. A body that cannot be read is a soft failure;
    /// a body that is not the expected JSON is not.
    pub async fn call_json<B, T>(&self, method: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = Bytes::from(serde_json::to_vec(body)?);
        let bytes = self
            .failover(method, None, &body, ACCEPT_JSON, |resp, endpoint| async move {
                resp.bytes().await.map_err(|e| {
                    AttemptError::Soft(AppError::Transport { endpoint, message: e.to_string() })
                })
            })
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn failover<T, F, Fut>(
        &self,
        method: &str,
        query_string: Option<&str>,
        body: &Bytes,
        accept: &str,
        mut finish: F,
    ) -> AppResult<T>
    where
        F: FnMut(Response, String) -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        if self.endpoints.is_empty() {
            return Err(AppError::NoEndpoints);
        }

        let mut last_err = None;
        for (idx, endpoint) in self.endpoints.iter().enumerate() {
            let attempt = match self.send_authorized(endpoint, method, query_string, body, accept).await {
                Ok(resp) => finish(resp, endpoint.clone()).await,
                Err(e) => Err(e),
            };

            match attempt {
                Ok(value) => {
                    if idx > 0 {
                        tracing::info!(
                            %endpoint,
                            method,
                            attempt = idx + 1,
                            total = self.endpoints.len(),
                            "Upstream fallback succeeded"
                        );
                    }
                    return Ok(value);
                },
                Err(AttemptError::Fatal(e)) => {
                    tracing::error!(%endpoint, method, error = %e, "Upstream call aborted");
                    return Err(e);
                },
                Err(AttemptError::Soft(e)) => {
                    tracing::warn!(%endpoint, method, error = %e, "Upstream endpoint failed, trying next");
                    last_err = Some(e);
                },
            }
        }

        Err(last_err.unwrap_or(AppError::NoEndpoints))
    }

    /// One endpoint attempt including the single refresh-and-retry on `401`.
    ///
    /// Every endpoint gets its own refresh, so a run of rejecting endpoints
    /// refreshes once per endpoint.
    async fn send_authorized(
        &self,
        endpoint: &str,
        method: &str,
        query_string: Option<&str>,
        body: &Bytes,
        accept: &str,
    ) -> Result<Response, AttemptError> {
        let url = build_url(endpoint, method, query_string);

        let token = self.current_token().await.map_err(AttemptError::Fatal)?;
        let resp = self.send(endpoint, &url, &token, body, accept).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return check_status(resp, endpoint).await;
        }
        drop(resp);

        tracing::warn!(%endpoint, method, "Upstream returned 401, refreshing credentials");
        self.provider.refresh_token().await.map_err(AttemptError::Soft)?;
        let token = self.current_token().await.map_err(AttemptError::Soft)?;

        // A second 401 is an ordinary endpoint failure.
        let resp = self.send(endpoint, &url, &token, body, accept).await?;
        check_status(resp, endpoint).await
    }

    async fn current_token(&self) -> AppResult<String> {
        let creds = self.provider.get_credentials().await?;
        let token = creds.access_token.trim();
        if token.is_empty() {
            return Err(AppError::EmptyToken);
        }
        Ok(token.to_string())
    }

    async fn send(
        &self,
        endpoint: &str,
        url: &str,
        token: &str,
        body: &Bytes,
        accept: &str,
    ) -> Result<Response, AttemptError> {
        let headers = build_headers(token, accept).map_err(AttemptError::Fatal)?;
        self.http.post(url).headers(headers).body(body.clone()).send().await.map_err(|e| {
            AttemptError::Soft(AppError::Transport { endpoint: endpoint.to_string(), message: e.to_string() })
        })
    }
}

async fn check_status(resp: Response, endpoint: &str) -> Result<Response, AttemptError> {
    if resp.status() == StatusCode::OK {
        return Ok(resp);
    }
    Err(AttemptError::Soft(AppError::Upstream(read_upstream_error(resp, endpoint).await)))
}

async fn read_upstream_error(resp: Response, endpoint: &str) -> UpstreamError {
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = resp.text().await.unwrap_or_default();
    UpstreamError { status, body, content_type, endpoint: endpoint.to_string() }
}
