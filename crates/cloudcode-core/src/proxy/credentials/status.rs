use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{now_ms, CredentialProvider};

/// Credential summary for operators. Never carries token material.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CredentialStatus {
    pub present: bool,
    pub provider: &'static str,
    pub has_refresh_token: bool,
    pub expiry_date: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
    pub expires_in_secs: Option<i64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

impl CredentialStatus {
    pub async fn collect(provider: &dyn CredentialProvider) -> Self {
        let now = now_ms();
        match provider.get_credentials().await {
            Ok(creds) if creds.has_token_material() => Self {
                present: true,
                provider: provider.describe(),
                has_refresh_token: !creds.refresh_token.trim().is_empty(),
                expiry_date: creds.expiry_date,
                expires_at: creds.expires_at(),
                expired: creds.is_expired(now),
                expires_in_secs: creds.expires_in_secs(now),
                token_type: Some(creds.token_type),
                scope: creds.scope,
            },
            Ok(_) => Self::absent(provider.describe()),
            Err(e) => {
                tracing::debug!(error = %e, "No usable credentials");
                Self::absent(provider.describe())
            },
        }
    }

    fn absent(provider: &'static str) -> Self {
        Self {
            present: false,
            provider,
            has_refresh_token: false,
            expiry_date: 0,
            expires_at: None,
            expired: false,
            expires_in_secs: None,
            token_type: None,
            scope: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::credentials::MemoryCredentialProvider;
    use cloudcode_types::Credentials;

    #[tokio::test]
    async fn test_status_reports_expiry_without_tokens() {
        let provider = MemoryCredentialProvider::new(Credentials {
            access_token: "ya29.secret".to_string(),
            refresh_token: "1//secret".to_string(),
            expiry_date: 1,
            ..Credentials::default()
        });
        let status = CredentialStatus::collect(&provider).await;
        assert!(status.present);
        assert!(status.expired);
        assert!(status.has_refresh_token);
        assert_eq!(status.provider, "memory");

        let rendered = serde_json::to_string(&status).unwrap_or_default();
        assert!(!rendered.contains("secret"));
    }

    #[tokio::test]
    async fn test_status_without_material() {
        let provider = MemoryCredentialProvider::new(Credentials::default());
        let status = CredentialStatus::collect(&provider).await;
        assert!(!status.present);
        assert_eq!(status.expires_in_secs, None);
    }
}
