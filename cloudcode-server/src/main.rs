//! CloudCode Gateway - Headless Daemon
//!
//! Serves OpenAI-style `/v1/chat/completions` + `/v1/models` and Gemini-style
//! `models/{model}:{action}` endpoints, translating every call into the
//! CloudCode `v1internal` API with one operator-supplied OAuth identity.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod cli;
mod commands;
mod server_utils;

use cli::{Cli, Commands, ServeArgs};
use cloudcode_core::modules::logger::init_logging;
use cloudcode_core::proxy::middleware::AdminKey;
use cloudcode_core::proxy::CredentialStatus;
use cloudcode_core::{AppState, AxumServer, ServerStartConfig};
use cloudcode_types::GatewayConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default()));

    let serve_args = match &command {
        Commands::Serve(args) => Some(args),
        _ => None,
    };
    let mut config = commands::load_config(cli.config.as_deref(), serve_args)?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    let _log_guard = init_logging(&config.log)?;

    match command {
        Commands::Serve(_) => serve(config).await,
        Commands::Credentials(cmd) => commands::handle_credentials_command(&config, cmd).await,
        Commands::Project => commands::handle_project(&config).await,
        Commands::Models { json } => commands::handle_models(&config, json).await,
    }
}

async fn serve(config: GatewayConfig) -> Result<()> {
    let (provider, upstream) = commands::build_upstream(&config)?;

    let status = CredentialStatus::collect(provider.as_ref()).await;
    if !status.present {
        warn!(path = %provider.path().display(), "No credentials yet; import them via the admin API or CLI");
    } else if status.expired && !status.has_refresh_token {
        warn!("Access token expired and no refresh token is available");
    }
    if config.admin_key.is_none() {
        info!("No admin key configured; /admin routes are disabled");
    }

    info!(
        endpoints = ?upstream.endpoints(),
        project_override = config.project_override().unwrap_or("-"),
        "CloudCode Gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let state = AppState::new(upstream, config.project_override().map(str::to_string));
    let server = AxumServer::new(ServerStartConfig {
        host: config.host.clone(),
        port: config.port,
        state,
        admin_key: AdminKey::new(config.admin_key.as_deref()),
    });

    server.run(server_utils::shutdown_signal()).await.map_err(|e| anyhow::anyhow!(e))?;
    info!("Gateway stopped");
    Ok(())
}
