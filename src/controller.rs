//! Chat session controller
//!
//! The controller owns the transcript and the provider boundary: it
//! appends the user turn, composes the outbound payload with the fixed
//! system instruction first, drains the streamed reply while forwarding
//! fragments for display, and appends the assistant turn once the
//! stream completes. Failures surface as a structured [`TurnFailure`]
//! rather than a crash, and leave the transcript intact so the user can
//! retry by submitting again.

use crate::error::WaypointError;
use crate::prompts;
use crate::providers::{ChatMessage, Provider};
use crate::session::Session;
use futures::StreamExt;
use std::fmt;

/// Broad classification of a failed turn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credential rejected or model access denied
    Authentication,
    /// Transport fault before or during streaming
    Network,
    /// Service-side rejection or malformed response
    Service,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Network => write!(f, "network"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// Structured description of a failed turn attempt
///
/// Every failure is terminal for that turn only; there is no retry
/// policy. The detail string carries the raw underlying error text for
/// the expandable detail display.
#[derive(Debug, Clone)]
pub struct TurnFailure {
    /// Broad failure classification
    pub kind: FailureKind,
    /// Raw underlying error text
    pub detail: String,
}

impl fmt::Display for TurnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.detail)
    }
}

impl std::error::Error for TurnFailure {}

/// Result of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty or whitespace-only; nothing was sent or recorded
    Ignored,
    /// Stream completed; the concatenated reply was appended to the session
    Reply(String),
}

/// Chat Session Controller
///
/// Holds the append-only [`Session`] and delegates completion requests
/// to the configured [`Provider`]. One request is outstanding at a time
/// (`submit` takes `&mut self`), matching the single idle →
/// awaiting-response → idle flow of an interactive session.
///
/// # Examples
///
/// ```no_run
/// use waypoint::config::ProviderConfig;
/// use waypoint::controller::ChatController;
/// use waypoint::credentials::Credential;
/// use waypoint::providers;
///
/// # async fn example() -> waypoint::error::Result<()> {
/// let provider = providers::create_provider(
///     ProviderConfig::default(),
///     Credential::new("sk-test").unwrap(),
/// )?;
/// let mut controller = ChatController::new(provider);
/// let outcome = controller
///     .submit("오사카 맛집 추천", |fragment| print!("{}", fragment))
///     .await;
/// # Ok(())
/// # }
/// ```
pub struct ChatController {
    session: Session,
    provider: Box<dyn Provider>,
}

impl ChatController {
    /// Creates a controller with an empty session
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            session: Session::new(),
            provider,
        }
    }

    /// Returns the transcript
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the model identifier of the underlying provider
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Submits user input and streams the reply
    ///
    /// Empty or whitespace-only input is ignored: no turn is recorded
    /// and no request is sent. Otherwise the user turn is appended to
    /// the session before the request goes out, so it stays visible
    /// even when the call fails. Each arriving fragment is passed to
    /// `on_fragment` and accumulated; on stream completion the
    /// concatenated text is appended as the assistant turn.
    ///
    /// # Arguments
    ///
    /// * `user_text` - Raw user input
    /// * `on_fragment` - Called with each text fragment as it arrives
    ///
    /// # Errors
    ///
    /// Returns a [`TurnFailure`] if the request or stream fails at any
    /// point; no assistant turn is appended in that case.
    pub async fn submit<F>(
        &mut self,
        user_text: &str,
        mut on_fragment: F,
    ) -> Result<SubmitOutcome, TurnFailure>
    where
        F: FnMut(&str),
    {
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }

        self.session.push_user(trimmed);

        let payload = self.build_payload();

        let mut stream = self
            .provider
            .stream_chat(&payload)
            .await
            .map_err(classify_failure)?;

        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment.map_err(classify_failure)?;
            on_fragment(&fragment);
            reply.push_str(&fragment);
        }

        tracing::debug!(reply_chars = reply.chars().count(), "Stream completed");
        self.session.push_assistant(reply.clone());
        Ok(SubmitOutcome::Reply(reply))
    }

    /// Composes the outbound payload: system instruction first, then
    /// every session turn in chronological order (the just-appended
    /// user turn last).
    fn build_payload(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.session.len() + 1);
        messages.push(ChatMessage::from(&prompts::system_turn()));
        messages.extend(self.session.turns().iter().map(ChatMessage::from));
        messages
    }
}

/// Maps an underlying error to a structured turn failure
fn classify_failure(error: anyhow::Error) -> TurnFailure {
    let kind = match error.downcast_ref::<WaypointError>() {
        Some(WaypointError::Authentication(_)) => FailureKind::Authentication,
        Some(WaypointError::Http(_)) | Some(WaypointError::Stream(_)) => FailureKind::Network,
        _ => FailureKind::Service,
    };
    TurnFailure {
        kind,
        detail: format!("{:#}", error),
    }
}
