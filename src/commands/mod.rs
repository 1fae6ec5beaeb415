//! Command handlers for the Waypoint CLI

use crate::config::Config;
use crate::error::Result;

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Acquires the API credential, instantiates the provider and the
    //! chat controller, and runs a readline-based loop that submits
    //! user input and renders the streamed reply incrementally.

    use super::*;
    use crate::controller::{ChatController, SubmitOutcome, TurnFailure};
    use crate::credentials;
    use crate::providers;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::io::Write;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `model` - Optional override for the configured model
    /// * `api_key` - Optional API key from the command line
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or the provider
    /// cannot be constructed. A missing credential is not an error: the
    /// session halts with an informational message.
    pub async fn run_chat(
        config: Config,
        model: Option<String>,
        api_key: Option<String>,
    ) -> Result<()> {
        let mut provider_config = config.provider;
        if let Some(model) = model {
            provider_config.model = model;
        }

        let credential = match credentials::acquire(api_key.as_deref())? {
            Some(credential) => credential,
            None => {
                println!(
                    "{}",
                    "An OpenAI API key is required to continue. Set OPENAI_API_KEY, \
                     add it to a local .env file, or enter it at the prompt."
                        .yellow()
                );
                return Ok(());
            }
        };

        let provider = providers::create_provider(provider_config, credential)?;
        let mut controller = ChatController::new(provider);

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(controller.model());

        loop {
            match rl.readline(&user_prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if matches!(trimmed, "/quit" | "/exit") {
                        break;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    println!("{}", "assistant >".green());
                    let outcome = controller
                        .submit(trimmed, |fragment| {
                            print!("{}", fragment);
                            let _ = std::io::stdout().flush();
                        })
                        .await;
                    println!();

                    match outcome {
                        Ok(SubmitOutcome::Reply(_)) => {
                            println!();
                        }
                        Ok(SubmitOutcome::Ignored) => {}
                        Err(failure) => {
                            print_turn_failure(&failure);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C cancels the current input line only.
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Prompt string for the user input line
    fn user_prompt() -> String {
        format!("{} ", "you >".cyan())
    }

    /// Print the session banner with the active model
    fn print_welcome_banner(model: &str) {
        println!("{}", "waypoint — travel recommendation chat".bold());
        println!("Model: {}", model.cyan());
        println!("Ask about a region to get numbered destination and restaurant picks.");
        println!("Type {} or press Ctrl-D to leave.\n", "/quit".cyan());
    }

    /// Print a failed turn: a short warning plus the technical detail
    ///
    /// The transcript stays intact, so the user can retry by submitting
    /// again.
    fn print_turn_failure(failure: &TurnFailure) {
        println!(
            "{}",
            "Could not generate a response. Check your API key, model access, or network."
                .yellow()
        );
        println!("{}", format!("details ({}):", failure.kind).dimmed());
        for line in failure.detail.lines() {
            println!("  {}", line.dimmed());
        }
        println!();
    }

}
