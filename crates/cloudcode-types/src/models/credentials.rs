//! OAuth credential record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth credential record, identical in every storage backend.
///
/// `expiry_date` is epoch milliseconds; `0` means the expiry is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// OAuth access token presented as the bearer token upstream
    #[serde(default)]
    pub access_token: String,
    /// OAuth refresh token for renewing access
    #[serde(default)]
    pub refresh_token: String,
    /// Absolute expiry as epoch milliseconds
    #[serde(default)]
    pub expiry_date: i64,
    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Granted scopes, space separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// OpenID token returned alongside the access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            refresh_token: String::new(),
            expiry_date: 0,
            token_type: default_token_type(),
            scope: None,
            id_token: None,
        }
    }
}

impl Credentials {
    /// Credentials holding only an access token (no refresh possible).
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), ..Self::default() }
    }

    /// True when the record carries either token.
    pub fn has_token_material(&self) -> bool {
        !self.access_token.trim().is_empty() || !self.refresh_token.trim().is_empty()
    }

    /// Check expiry against `now_ms`. Unknown expiry is never expired.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expiry_date > 0 && now_ms >= self.expiry_date
    }

    /// Absolute expiry, `None` when unknown.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expiry_date <= 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.expiry_date)
    }

    /// Remaining validity in whole seconds, negative once expired.
    pub fn expires_in_secs(&self, now_ms: i64) -> Option<i64> {
        if self.expiry_date <= 0 {
            return None;
        }
        Some(self.expiry_date.saturating_sub(now_ms) / 1000)
    }
}

/// Response body of the OAuth token endpoint for a refresh grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credential_file_shape() {
        let raw = r#"{
            "access_token": "ya29.abc",
            "refresh_token": "1//refresh",
            "expiry_date": 1700000000000,
            "token_type": "Bearer"
        }"#;
        let creds: Credentials = serde_json::from_str(raw).unwrap();
        assert_eq!(creds.access_token, "ya29.abc");
        assert_eq!(creds.expiry_date, 1_700_000_000_000);
        assert!(creds.scope.is_none());

        let out = serde_json::to_value(&creds).unwrap();
        assert!(out.get("scope").is_none());
        assert!(out.get("id_token").is_none());
    }

    #[test]
    fn test_expiry_helpers() {
        let creds = Credentials { expiry_date: 10_000, ..Credentials::from_access_token("t") };
        assert!(!creds.is_expired(9_999));
        assert!(creds.is_expired(10_000));
        assert_eq!(creds.expires_in_secs(4_000), Some(6));
        assert_eq!(creds.expires_in_secs(12_000), Some(-2));

        let unknown = Credentials::from_access_token("t");
        assert!(!unknown.is_expired(i64::MAX));
        assert_eq!(unknown.expires_in_secs(0), None);
        assert!(unknown.expires_at().is_none());

        let at = Credentials { expiry_date: 1_700_000_000_000, ..unknown }.expires_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn test_token_material() {
        assert!(!Credentials::default().has_token_material());
        let refresh_only = Credentials { refresh_token: "r".into(), ..Credentials::default() };
        assert!(refresh_only.has_token_material());
    }
}
