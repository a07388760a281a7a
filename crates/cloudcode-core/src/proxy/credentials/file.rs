use async_trait::async_trait;
use cloudcode_types::models::OAuthClientConfig;
use cloudcode_types::Credentials;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};

use super::{now_ms, CredentialProvider};
use crate::error::{AppError, AppResult};
use crate::modules::oauth;
use crate::utils::file_utils::atomic_write_json;

/// Credential record stored as a JSON file (`oauth_creds.json` layout).
///
/// The file is read on first use and cached. Refreshes are serialized; a
/// refresh that finds the token already rotated by another caller is skipped.
pub struct FileCredentialProvider {
    path: PathBuf,
    http: reqwest::Client,
    oauth_client: OAuthClientConfig,
    cache: RwLock<Option<Credentials>>,
    refresh_lock: Mutex<()>,
}

impl FileCredentialProvider {
    pub fn new(path: impl Into<PathBuf>, http: reqwest::Client, oauth_client: OAuthClientConfig) -> Self {
        Self {
            path: path.into(),
            http,
            oauth_client,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AppResult<Credentials> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Credentials(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let creds: Credentials = serde_json::from_str(&raw).map_err(|e| {
            AppError::Credentials(format!("invalid credential file {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), "Loaded credentials from file");
        Ok(creds)
    }

    async fn store(&self, creds: Credentials) -> AppResult<()> {
        atomic_write_json(&self.path, &creds).await?;
        *self.cache.write().await = Some(creds);
        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for FileCredentialProvider {
    async fn get_credentials(&self) -> AppResult<Credentials> {
        if let Some(creds) = self.cache.read().await.as_ref() {
            return Ok(creds.clone());
        }
        let mut cache = self.cache.write().await;
        if let Some(creds) = cache.as_ref() {
            return Ok(creds.clone());
        }
        let creds = self.load().await?;
        *cache = Some(creds.clone());
        Ok(creds)
    }

    async fn refresh_token(&self) -> AppResult<()> {
        let seen = self.get_credentials().await?;
        let _guard = self.refresh_lock.lock().await;

        let current = self.get_credentials().await?;
        if current.access_token != seen.access_token {
            tracing::debug!("Token already refreshed by a concurrent request");
            return Ok(());
        }

        let response =
            oauth::refresh_access_token(&self.http, &self.oauth_client, &current.refresh_token).await?;

        let mut updated = current;
        updated.access_token = response.access_token;
        if let Some(expires_in) = response.expires_in {
            updated.expiry_date = now_ms().saturating_add(expires_in.saturating_mul(1000));
        }
        if let Some(token_type) = response.token_type {
            updated.token_type = token_type;
        }
        if response.scope.is_some() {
            updated.scope = response.scope;
        }
        if response.id_token.is_some() {
            updated.id_token = response.id_token;
        }
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            updated.refresh_token = refresh_token;
        }

        self.store(updated).await?;
        tracing::info!(path = %self.path.display(), "Refreshed OAuth access token");
        Ok(())
    }

    async fn save_credentials(&self, credentials: Credentials) -> AppResult<()> {
        let _guard = self.refresh_lock.lock().await;
        self.store(credentials).await
    }

    fn describe(&self) -> &'static str {
        "file"
    }
}
