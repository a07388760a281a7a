//! Gateway configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default CloudCode endpoints, in failover order.
pub const DEFAULT_ENDPOINTS: &[&str] =
    &["https://daily-cloudcode-pa.googleapis.com", "https://cloudcode-pa.googleapis.com"];

/// Google OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8045
}

fn default_endpoints() -> Vec<String> {
    DEFAULT_ENDPOINTS.iter().map(|s| (*s).to_string()).collect()
}

fn default_request_timeout() -> u64 {
    600
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OAuth client used for the refresh grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthClientConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for OAuthClientConfig {
    fn default() -> Self {
        Self { client_id: String::new(), client_secret: String::new(), token_url: default_token_url() }
    }
}

/// Logging output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `cloudcode_core=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily rolling log files; stdout only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level(), dir: None }
    }
}

/// Top-level gateway configuration, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Credential record location; `<data dir>/oauth_creds.json` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,
    /// Operator project override; skips discovery entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Upstream base URLs, tried strictly in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    /// Whole-request timeout for upstream calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Static operator key guarding `/admin/*`; admin routes reject all requests when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<String>,
    #[serde(default)]
    pub oauth: OAuthClientConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            credentials_path: None,
            project_id: None,
            endpoints: default_endpoints(),
            request_timeout_secs: default_request_timeout(),
            admin_key: None,
            oauth: OAuthClientConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ValidationError {
                field: "port".to_string(),
                message: "must be non-zero".to_string(),
            });
        }
        if self.endpoints.is_empty() {
            return Err(ConfigError::ValidationError {
                field: "endpoints".to_string(),
                message: "at least one upstream endpoint is required".to_string(),
            });
        }
        if let Some(bad) = self.endpoints.iter().find(|e| !e.starts_with("http")) {
            return Err(ConfigError::ValidationError {
                field: "endpoints".to_string(),
                message: format!("not an http(s) URL: {}", bad),
            });
        }
        Ok(())
    }

    /// Project override, ignoring blank values.
    pub fn project_override(&self) -> Option<&str> {
        self.project_id.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: GatewayConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.port, 8045);
        assert_eq!(config.endpoints[0], "https://daily-cloudcode-pa.googleapis.com");
        assert_eq!(config.oauth.token_url, DEFAULT_TOKEN_URL);
    }

    #[test]
    fn test_validate_rejects_empty_endpoints() {
        let config = GatewayConfig { endpoints: vec![], ..GatewayConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError { .. })));

        let config =
            GatewayConfig { endpoints: vec!["ftp://x".to_string()], ..GatewayConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_project_override_is_ignored() {
        let config = GatewayConfig { project_id: Some("  ".to_string()), ..GatewayConfig::default() };
        assert_eq!(config.project_override(), None);

        let config =
            GatewayConfig { project_id: Some("my-proj".to_string()), ..GatewayConfig::default() };
        assert_eq!(config.project_override(), Some("my-proj"));
    }
}
