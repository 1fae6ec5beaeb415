//! Waypoint - streaming travel-recommendation chat CLI library
//!
//! This library provides the core functionality for the Waypoint chat
//! CLI: the conversation transcript, the chat session controller, the
//! streaming completion provider, and configuration management.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Transcript data model (roles, turns, append-only session)
//! - `controller`: Chat session controller driving submit/stream/append
//! - `providers`: Completion provider trait and OpenAI implementation
//! - `prompts`: Fixed travel-recommendation system instruction
//! - `credentials`: API key acquisition (env, `.env` file, prompt)
//! - `config`: Configuration loading and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use waypoint::config::ProviderConfig;
//! use waypoint::controller::ChatController;
//! use waypoint::credentials::Credential;
//! use waypoint::providers;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = providers::create_provider(
//!         ProviderConfig::default(),
//!         Credential::new("sk-test").unwrap(),
//!     )?;
//!     let mut controller = ChatController::new(provider);
//!     controller
//!         .submit("오사카 맛집 추천", |fragment| print!("{}", fragment))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use controller::{ChatController, FailureKind, SubmitOutcome, TurnFailure};
pub use credentials::Credential;
pub use error::{Result, WaypointError};
pub use session::{Role, Session, Turn};
