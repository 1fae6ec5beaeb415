//! Completion provider abstraction for Waypoint
//!
//! This module defines the provider trait, wire-level message types, and
//! the OpenAI implementation, plus a factory for constructing the
//! configured provider.

pub mod base;
pub mod openai;

pub use base::{ChatMessage, CompletionStream, Provider};
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::credentials::Credential;
use crate::error::Result;

/// Creates the completion provider for the given configuration
///
/// # Arguments
///
/// * `config` - Provider configuration (model, API base, timeouts)
/// * `credential` - API key for the service
///
/// # Errors
///
/// Returns an error if the provider cannot be constructed
pub fn create_provider(
    config: ProviderConfig,
    credential: Credential,
) -> Result<Box<dyn Provider>> {
    let provider = OpenAiProvider::new(config, credential)?;
    Ok(Box::new(provider))
}
