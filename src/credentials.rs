//! API credential acquisition for Waypoint
//!
//! The key is looked up in order: explicit CLI override, the
//! `OPENAI_API_KEY` environment variable, a local `.env` file, and
//! finally an interactive prompt. Whatever is found is held in memory
//! for the session's lifetime and never persisted.

use crate::error::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt;

/// Environment variable holding the OpenAI API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Opaque API key held for the session's lifetime
///
/// The inner key never appears in `Debug` output or logs.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Creates a credential from a raw key string
    ///
    /// Returns `None` for empty or whitespace-only input.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::credentials::Credential;
    ///
    /// assert!(Credential::new("sk-test").is_some());
    /// assert!(Credential::new("   ").is_none());
    /// ```
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the raw key for use in request headers
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Looks up the API key without prompting
///
/// Checks the CLI override first, then the process environment after
/// loading a local `.env` file (which only fills in variables that are
/// not already set).
///
/// # Arguments
///
/// * `cli_key` - Key supplied via `--api-key`, if any
pub fn from_environment(cli_key: Option<&str>) -> Option<Credential> {
    if let Some(key) = cli_key {
        return Credential::new(key);
    }

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::debug!("Skipping unreadable .env file: {}", e);
        }
    }

    std::env::var(API_KEY_ENV).ok().and_then(Credential::new)
}

/// Prompts interactively for an API key
///
/// Returns `Ok(None)` when the user aborts (Ctrl-C / Ctrl-D) or enters
/// a blank line; the caller halts with an informational message.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read
pub fn prompt_for_key() -> Result<Option<Credential>> {
    let mut editor = DefaultEditor::new()?;
    match editor.readline("OpenAI API key: ") {
        Ok(line) => Ok(Credential::new(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Acquires the API credential from all sources in order
///
/// # Arguments
///
/// * `cli_key` - Key supplied via `--api-key`, if any
///
/// # Returns
///
/// Returns `Ok(None)` when no credential could be obtained; no request
/// must be attempted in that case.
pub fn acquire(cli_key: Option<&str>) -> Result<Option<Credential>> {
    if let Some(credential) = from_environment(cli_key) {
        tracing::debug!("Using API credential from environment");
        return Ok(Some(credential));
    }
    prompt_for_key()
}
