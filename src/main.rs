use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use arvancloud_dns::{
    config::Settings,
    dns::ArvanCloudClient,
    plugin::{Authenticator, AuthenticatorConfig, Dns01Challenge},
    secrets,
};

#[derive(Parser)]
#[command(name = "arvancloud-dns")]
#[command(about = "ArvanCloud DNS-01 challenge helper for certbot manual hooks")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the challenge TXT record (--manual-auth-hook)
    Auth(ChallengeArgs),

    /// Remove the challenge TXT record (--manual-cleanup-hook)
    Cleanup(ChallengeArgs),

    /// Store the ArvanCloud API key
    SetToken,

    /// Delete the stored ArvanCloud API key
    DeleteToken,

    /// Show configuration file location and contents
    Config,
}

#[derive(Args)]
struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    domain: String,

    /// Validation string to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    validation: String,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let loaded = if config_path.exists() {
        Some(Settings::load_from(&config_path)?)
    } else {
        None
    };
    let settings = loaded.clone().unwrap_or_default();

    init_logging(&settings.plugin.log_level);

    match cli.command {
        Commands::Auth(args) => {
            let authenticator = build_authenticator(&settings)?;
            let challenge = Dns01Challenge::new(&args.domain, &args.validation);
            authenticator
                .perform(&[challenge])
                .await
                .with_context(|| format!("Failed to create challenge record for {}", args.domain))?;
        }

        Commands::Cleanup(args) => {
            let authenticator = build_authenticator(&settings)?;
            let challenge = Dns01Challenge::new(&args.domain, &args.validation);
            authenticator
                .cleanup(&[challenge])
                .await
                .with_context(|| format!("Failed to remove challenge record for {}", args.domain))?;
        }

        Commands::SetToken => {
            let token = rpassword::prompt_password("ArvanCloud API key: ")?;
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("API key must not be empty");
            }

            // reject anything that could not be sent as a header
            ArvanCloudClient::new(token)?;

            secrets::store_token(&settings.plugin.credentials, token)?;
            println!("API key stored in {}", settings.plugin.credentials.display());
        }

        Commands::DeleteToken => {
            secrets::delete_token(&settings.plugin.credentials)?;
            println!("API key deleted from {}", settings.plugin.credentials.display());
        }

        Commands::Config => {
            show_config(&config_path, &loaded)?;
        }
    }

    Ok(())
}

fn build_authenticator(settings: &Settings) -> Result<Authenticator<ArvanCloudClient>> {
    let token = secrets::resolve_token(&settings.plugin.credentials)?;
    let client = ArvanCloudClient::new(&token)?.with_base_url(&settings.record.endpoint);

    info!("Using ArvanCloud API at {}", settings.record.endpoint);
    Ok(Authenticator::new(client, AuthenticatorConfig::from(settings)))
}

fn show_config(config_path: &std::path::Path, settings: &Option<Settings>) -> Result<()> {
    println!("Configuration file location: {}\n", config_path.display());

    match settings {
        Some(s) => {
            println!("Current configuration:\n");
            println!("{}", toml::to_string_pretty(s)?);
        }
        None => {
            println!("Configuration file not found, defaults are in effect:\n");
            println!("{}", toml::to_string_pretty(&Settings::default())?);
        }
    }

    Ok(())
}
