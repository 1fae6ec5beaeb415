//! Command-line interface definition for Waypoint
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};

/// Waypoint - streaming travel-recommendation chat CLI
///
/// Chat with a travel-recommendation assistant; replies stream to the
/// terminal as they are generated.
#[derive(Parser, Debug, Clone)]
#[command(name = "waypoint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Waypoint
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,

        /// API key (otherwise OPENAI_API_KEY, a local .env file, or an
        /// interactive prompt is used)
        #[arg(long)]
        api_key: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
