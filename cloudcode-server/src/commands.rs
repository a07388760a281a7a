use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::path::Path;
use std::sync::Arc;

use cloudcode_core::modules::config as core_config;
use cloudcode_core::proxy::handlers::openai::build_model_list;
use cloudcode_core::proxy::CredentialStatus;
use cloudcode_core::utils::http::create_client;
use cloudcode_core::{CredentialProvider, FileCredentialProvider, ProjectResolver, UpstreamClient};
use cloudcode_types::{Credentials, GatewayConfig};

use crate::cli::{CredentialCommands, ServeArgs};

/// File, then `CLOUDCODE_*` variables, then flags.
pub fn load_config(path: Option<&Path>, serve: Option<&ServeArgs>) -> Result<GatewayConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => core_config::default_config_path()?,
    };
    let mut config = core_config::load_config_from(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    core_config::apply_env_overrides(&mut config)?;

    if let Some(args) = serve {
        if let Some(host) = &args.host {
            config.host = host.clone();
        }
        if let Some(port) = args.port {
            config.port = port;
        }
        if let Some(creds) = &args.credentials {
            config.credentials_path = Some(creds.clone());
        }
        if let Some(project) = &args.project {
            config.project_id = Some(project.clone());
        }
        if !args.upstream.is_empty() {
            config.endpoints = args.upstream.clone();
        }
    }

    config.validate()?;
    Ok(config)
}

/// Shared HTTP client, file-backed credentials and the upstream client built on them.
pub fn build_upstream(config: &GatewayConfig) -> Result<(Arc<FileCredentialProvider>, Arc<UpstreamClient>)> {
    let http = create_client(config.request_timeout_secs)?;
    let creds_path = core_config::resolve_credentials_path(config)?;
    let provider = Arc::new(FileCredentialProvider::new(creds_path, http.clone(), config.oauth.clone()));
    let upstream = Arc::new(UpstreamClient::new(http, provider.clone(), config.endpoints.clone()));
    Ok((provider, upstream))
}

pub async fn handle_credentials_command(config: &GatewayConfig, cmd: CredentialCommands) -> Result<()> {
    let (provider, _) = build_upstream(config)?;
    match cmd {
        CredentialCommands::Status { json } => show_credential_status(&provider, json).await,
        CredentialCommands::Import { file } => import_credentials(&provider, &file).await,
    }
}

async fn show_credential_status(provider: &FileCredentialProvider, json: bool) -> Result<()> {
    let status = CredentialStatus::collect(provider).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec![Cell::new("File"), Cell::new(provider.path().display())]);
    table.add_row(vec![
        Cell::new("Present"),
        if status.present {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        },
    ]);
    table.add_row(vec![
        Cell::new("Refresh token"),
        Cell::new(if status.has_refresh_token { "yes" } else { "no" }),
    ]);
    table.add_row(vec![Cell::new("Expires"), expiry_cell(&status)]);
    table.add_row(vec![Cell::new("Scope"), Cell::new(status.scope.as_deref().unwrap_or("-"))]);
    println!("{table}");
    Ok(())
}

fn expiry_cell(status: &CredentialStatus) -> Cell {
    let Some(secs) = status.expires_in_secs else {
        return Cell::new("unknown");
    };
    let at = status
        .expires_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default();
    if status.expired {
        Cell::new(format!("{} (expired)", at)).fg(Color::Red)
    } else {
        Cell::new(format!("{} (in {}m)", at, secs / 60)).fg(Color::Green)
    }
}

async fn import_credentials(provider: &FileCredentialProvider, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let credentials: Credentials =
        serde_json::from_str(&raw).with_context(|| format!("Invalid credential JSON in {}", file.display()))?;
    if !credentials.has_token_material() {
        anyhow::bail!("Credential record needs an access_token or a refresh_token");
    }

    provider.save_credentials(credentials).await?;
    println!("{} {}", "Credentials saved to".green(), provider.path().display());
    Ok(())
}

pub async fn handle_project(config: &GatewayConfig) -> Result<()> {
    let (_, upstream) = build_upstream(config)?;
    let resolver = ProjectResolver::new(upstream, config.project_override().map(str::to_string));
    let project = resolver.project_id().await?;
    println!("{}", project);
    Ok(())
}

pub async fn handle_models(config: &GatewayConfig, json: bool) -> Result<()> {
    let (_, upstream) = build_upstream(config)?;
    let list = build_model_list(&upstream.fetch_available_models().await?);

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }
    if list.data.is_empty() {
        println!("{}", "No models available.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Model", "Owner", "Description"]);
    for model in &list.data {
        table.add_row(vec![
            Cell::new(&model.id),
            Cell::new(&model.owned_by),
            Cell::new(&model.description),
        ]);
    }
    println!("{table}");
    Ok(())
}
