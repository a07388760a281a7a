//! Project id discovery and onboarding.
//!
//! Priority: operator override, then `loadCodeAssist`, then the `onboardUser`
//! long-running operation polled until it reports `done`.

use cloudcode_types::protocol::{LoadCodeAssistResponse, OnboardUserRequest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

use crate::error::{AppError, AppResult};
use crate::proxy::upstream::UpstreamClient;

/// Delay between `onboardUser` polls.
pub const ONBOARD_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct ProjectResolver {
    upstream: Arc<UpstreamClient>,
    project_override: Option<String>,
    poll_interval: Duration,
    resolved: OnceCell<String>,
}

impl ProjectResolver {
    pub fn new(upstream: Arc<UpstreamClient>, project_override: Option<String>) -> Self {
        Self {
            upstream,
            project_override: project_override
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            poll_interval: ONBOARD_POLL_INTERVAL,
            resolved: OnceCell::new(),
        }
    }

    /// Override the poll delay (tests use milliseconds).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Resolved project id, computed once per process. Failures are not cached.
    pub async fn project_id(&self) -> AppResult<String> {
        self.resolved.get_or_try_init(|| self.resolve()).await.cloned()
    }

    /// Run discovery without consulting the cache.
    pub async fn resolve(&self) -> AppResult<String> {
        if let Some(project) = &self.project_override {
            tracing::info!(project_id = %project, "Using configured project override");
            return Ok(project.clone());
        }
        let load = self.upstream.load_code_assist().await?;
        self.resolve_from_load(&load).await
    }

    /// Decide from an already fetched `loadCodeAssist` response, onboarding if needed.
    pub async fn resolve_from_load(&self, load: &LoadCodeAssistResponse) -> AppResult<String> {
        if !load.gcp_managed {
            tracing::info!(
                project_id = %load.cloudaicompanion_project,
                "Using project from loadCodeAssist (gcpManaged=false)"
            );
            return Ok(load.cloudaicompanion_project.clone());
        }
        if !load.cloudaicompanion_project.is_empty() {
            tracing::info!(project_id = %load.cloudaicompanion_project, "Discovered project (quick path)");
            return Ok(load.cloudaicompanion_project.clone());
        }
        self.onboard(load).await
    }

    /// No internal deadline: only dropping the future stops the poll loop.
    async fn onboard(&self, load: &LoadCodeAssistResponse) -> AppResult<String> {
        let tier_id = load.default_tier_id();
        tracing::info!(tier_id, "Starting onboarding");

        let request = OnboardUserRequest::for_tier(tier_id);
        let started = Instant::now();
        let mut polls = 0u32;
        let mut operation = self.upstream.onboard_user(&request).await?;

        while !operation.done {
            polls += 1;
            tracing::debug!(polls, elapsed_ms = started.elapsed().as_millis() as u64, "Polling onboardUser");
            tokio::time::sleep(self.poll_interval).await;
            operation = self.upstream.onboard_user(&request).await?;
        }

        let project = operation.companion_project_id().ok_or(AppError::OnboardingIncomplete)?;
        tracing::info!(
            project_id = project,
            polls,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Discovered project after onboarding"
        );
        Ok(project.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::credentials::MemoryCredentialProvider;
    use serde_json::json;

    fn offline_resolver(project_override: Option<&str>) -> ProjectResolver {
        let upstream = UpstreamClient::new(
            reqwest::Client::new(),
            Arc::new(MemoryCredentialProvider::with_token("t")),
            Vec::new(),
        );
        ProjectResolver::new(Arc::new(upstream), project_override.map(str::to_string))
    }

    #[tokio::test]
    async fn test_override_skips_network() {
        let resolver = offline_resolver(Some(" my-proj "));
        assert_eq!(resolver.project_id().await.unwrap(), "my-proj");
    }

    #[tokio::test]
    async fn test_unmanaged_uses_companion_project() {
        let resolver = offline_resolver(None);
        let load: LoadCodeAssistResponse = serde_json::from_value(json!({
            "gcpManaged": false,
            "cloudaicompanionProject": "direct-proj"
        }))
        .unwrap();
        assert_eq!(resolver.resolve_from_load(&load).await.unwrap(), "direct-proj");
    }

    #[tokio::test]
    async fn test_managed_quick_path() {
        let resolver = offline_resolver(None);
        let load: LoadCodeAssistResponse =
            serde_json::from_value(json!({"cloudaicompanionProject": "quick"})).unwrap();
        assert_eq!(resolver.resolve_from_load(&load).await.unwrap(), "quick");
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let resolver = offline_resolver(None);
        assert!(matches!(resolver.project_id().await, Err(AppError::NoEndpoints)));
        assert!(resolver.resolved.get().is_none());
    }
}
