//! Credential management endpoints, mounted behind the admin key.

use axum::{extract::State, Json};
use bytes::Bytes;
use cloudcode_types::Credentials;
use serde_json::{json, Value};

use super::errors::ApiError;
use crate::proxy::credentials::CredentialStatus;
use crate::proxy::server::AppState;

pub async fn handle_credentials_status(State(state): State<AppState>) -> Json<CredentialStatus> {
    Json(CredentialStatus::collect(state.provider.as_ref()).await)
}

pub async fn handle_credentials_import(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let credentials: Credentials = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_request(format!("Invalid credential record: {}", e)))?;
    if !credentials.has_token_material() {
        return Err(ApiError::invalid_request(
            "credential record needs an access_token or a refresh_token",
        ));
    }

    state.provider.save_credentials(credentials).await?;
    tracing::info!(provider = state.provider.describe(), "Credentials replaced via admin API");

    let status = CredentialStatus::collect(state.provider.as_ref()).await;
    Ok(Json(json!({ "saved": true, "status": status })))
}
