//! Waypoint - streaming travel-recommendation chat CLI
//!
//! Main entry point for the Waypoint application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use waypoint::cli::{Cli, Commands};
use waypoint::commands;
use waypoint::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { model, api_key } => {
            tracing::info!("Starting interactive chat session");
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }

            commands::chat::run_chat(config, model, api_key).await?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "waypoint=debug" } else { "waypoint=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
