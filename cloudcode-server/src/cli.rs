use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cloudcode-server",
    about = "CloudCode Gateway - OpenAI and Gemini APIs over CloudCode v1internal",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "CLOUDCODE_CONFIG", help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log filter, e.g. info or cloudcode_core=debug")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the gateway (default if no command specified)")]
    Serve(ServeArgs),

    #[command(subcommand, about = "Inspect or replace the OAuth credential record")]
    Credentials(CredentialCommands),

    #[command(about = "Resolve and print the CloudCode project id")]
    Project,

    #[command(about = "List models exposed to clients")]
    Models {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(clap::Args, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Listen address")]
    pub host: Option<String>,

    #[arg(short, long, help = "Listen port")]
    pub port: Option<u16>,

    #[arg(long, help = "Credential record path")]
    pub credentials: Option<PathBuf>,

    #[arg(long, help = "Project id override; skips discovery")]
    pub project: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Upstream endpoints, in failover order")]
    pub upstream: Vec<String>,
}

#[derive(Subcommand)]
pub enum CredentialCommands {
    #[command(about = "Show credential presence and expiry")]
    Status {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Replace the credential record from a JSON file")]
    Import {
        #[arg(short, long, help = "Path to a credential JSON file")]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_is_optional() {
        let cli = Cli::try_parse_from(["cloudcode-server"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from([
            "cloudcode-server",
            "serve",
            "--port",
            "9000",
            "--upstream",
            "http://a,http://b",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.upstream, vec!["http://a", "http://b"]);
            },
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_credentials_import_requires_file() {
        assert!(Cli::try_parse_from(["cloudcode-server", "credentials", "import"]).is_err());
    }
}
