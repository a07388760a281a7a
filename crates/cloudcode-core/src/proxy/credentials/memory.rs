use async_trait::async_trait;
use cloudcode_types::Credentials;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::CredentialProvider;
use crate::error::{AppError, AppResult};

/// In-process credentials, for token injection and tests.
///
/// Each refresh pops the next queued access token; refreshing with an empty
/// queue fails.
pub struct MemoryCredentialProvider {
    inner: Mutex<MemoryState>,
    refreshes: AtomicUsize,
}

struct MemoryState {
    credentials: Credentials,
    refreshed_tokens: VecDeque<String>,
}

impl MemoryCredentialProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(MemoryState { credentials, refreshed_tokens: VecDeque::new() }),
            refreshes: AtomicUsize::new(0),
        }
    }

    /// Provider holding a bare access token.
    pub fn with_token(access_token: &str) -> Self {
        Self::new(Credentials::from_access_token(access_token))
    }

    /// Tokens handed out by successive refreshes, in order.
    pub fn with_refreshed_tokens<I, S>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let refreshes = self.refreshes;
        let mut state = self.inner.into_inner();
        state.refreshed_tokens.extend(tokens.into_iter().map(Into::into));
        Self { inner: Mutex::new(state), refreshes }
    }

    /// Number of refresh attempts so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for MemoryCredentialProvider {
    async fn get_credentials(&self) -> AppResult<Credentials> {
        Ok(self.inner.lock().await.credentials.clone())
    }

    async fn refresh_token(&self) -> AppResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.inner.lock().await;
        let token = state
            .refreshed_tokens
            .pop_front()
            .ok_or_else(|| AppError::Refresh("no refreshed token queued".to_string()))?;
        state.credentials.access_token = token;
        Ok(())
    }

    async fn save_credentials(&self, credentials: Credentials) -> AppResult<()> {
        self.inner.lock().await.credentials = credentials;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_pops_queued_tokens() {
        let provider = MemoryCredentialProvider::with_token("a").with_refreshed_tokens(["b"]);
        assert_eq!(provider.get_credentials().await.unwrap().access_token, "a");

        provider.refresh_token().await.unwrap();
        assert_eq!(provider.get_credentials().await.unwrap().access_token, "b");

        assert!(provider.refresh_token().await.is_err());
        assert_eq!(provider.refresh_count(), 2);
    }
}
