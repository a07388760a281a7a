//! Config file location, loading and environment overrides.

use cloudcode_types::{ConfigError, GatewayConfig};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::file_utils::atomic_write_json;

pub const CONFIG_FILE: &str = "config.json";
pub const CREDENTIALS_FILE: &str = "oauth_creds.json";
pub const DATA_DIR_ENV: &str = "CLOUDCODE_DATA_DIR";
const DATA_DIR: &str = ".cloudcode-gateway";

/// `$CLOUDCODE_DATA_DIR`, else `~/.cloudcode-gateway`. Created on first use.
pub fn get_data_dir() -> Result<PathBuf, ConfigError> {
    let data_dir = match std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or_else(|| ConfigError::NoDataDir { message: "no home directory".to_string() })?
            .join(DATA_DIR),
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|e| ConfigError::from_io_error(&e))?;
    }
    Ok(data_dir)
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}

/// Read `path`; a missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<GatewayConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(GatewayConfig::default());
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::from_io_error(&e))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))
}

pub async fn save_config_to(path: &Path, config: &GatewayConfig) -> Result<(), ConfigError> {
    atomic_write_json(path, config)
        .await
        .map_err(|e| ConfigError::IoError { message: e.to_string() })
}

/// Apply `CLOUDCODE_*` variables from the process environment.
pub fn apply_env_overrides(config: &mut GatewayConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from `lookup`. Blank values are ignored.
pub fn apply_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(host) = get("CLOUDCODE_HOST") {
        config.host = host;
    }
    if let Some(port) = get("CLOUDCODE_PORT") {
        config.port = port.parse().map_err(|_| ConfigError::ValidationError {
            field: "port".to_string(),
            message: format!("CLOUDCODE_PORT is not a port number: {}", port),
        })?;
    }
    if let Some(path) = get("CLOUDCODE_CREDENTIALS") {
        config.credentials_path = Some(PathBuf::from(path));
    }
    if let Some(project) = get("CLOUDCODE_GCP_PROJECT_ID").or_else(|| get("GOOGLE_CLOUD_PROJECT")) {
        config.project_id = Some(project);
    }
    if let Some(urls) = get("CLOUDCODE_UPSTREAM_URL") {
        config.endpoints = split_endpoints(&urls);
    }
    if let Some(key) = get("CLOUDCODE_ADMIN_KEY") {
        config.admin_key = Some(key);
    }
    if let Some(id) = get("CLOUDCODE_OAUTH_CLIENT_ID") {
        config.oauth.client_id = id;
    }
    if let Some(secret) = get("CLOUDCODE_OAUTH_CLIENT_SECRET") {
        config.oauth.client_secret = secret;
    }
    Ok(())
}

/// Comma-separated endpoint list, blanks dropped.
pub fn split_endpoints(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Configured credential file, else `<data dir>/oauth_creds.json`.
pub fn resolve_credentials_path(config: &GatewayConfig) -> Result<PathBuf, ConfigError> {
    match &config.credentials_path {
        Some(path) => Ok(path.clone()),
        None => Ok(get_data_dir()?.join(CREDENTIALS_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = GatewayConfig { port: 9000, ..GatewayConfig::default() };
        save_config_to(&path, &config).await.unwrap();
        assert_eq!(load_config_from(&path).unwrap().port, 9000);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GatewayConfig::default();
        apply_overrides(
            &mut config,
            lookup(&[
                ("CLOUDCODE_PORT", "9100"),
                ("CLOUDCODE_UPSTREAM_URL", "http://a, ,http://b"),
                ("GOOGLE_CLOUD_PROJECT", "fallback-proj"),
                ("CLOUDCODE_ADMIN_KEY", "  "),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.endpoints, vec!["http://a", "http://b"]);
        assert_eq!(config.project_id.as_deref(), Some("fallback-proj"));
        assert!(config.admin_key.is_none());
    }

    #[test]
    fn test_explicit_project_beats_google_cloud_project() {
        let mut config = GatewayConfig::default();
        apply_overrides(
            &mut config,
            lookup(&[("CLOUDCODE_GCP_PROJECT_ID", "mine"), ("GOOGLE_CLOUD_PROJECT", "other")]),
        )
        .unwrap();
        assert_eq!(config.project_id.as_deref(), Some("mine"));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = GatewayConfig::default();
        let err = apply_overrides(&mut config, lookup(&[("CLOUDCODE_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_configured_credentials_path_wins() {
        let config = GatewayConfig {
            credentials_path: Some(PathBuf::from("/tmp/creds.json")),
            ..GatewayConfig::default()
        };
        assert_eq!(resolve_credentials_path(&config).unwrap(), PathBuf::from("/tmp/creds.json"));
    }
}
