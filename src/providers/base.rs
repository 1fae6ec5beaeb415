//! Base provider trait and common types for Waypoint
//!
//! This module defines the Provider trait that completion services must
//! implement, along with the wire-level message type and the streaming
//! reply representation.

use crate::error::Result;
use crate::session::{Role, Turn};
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Wire-level message sent to the completion service
///
/// The outbound request body carries a list of these: the synthesized
/// system instruction first, then every transcript turn in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author (system, user, assistant)
    pub role: Role,
    /// Text content of the message
    pub content: String,
}

impl ChatMessage {
    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::providers::ChatMessage;
    /// use waypoint::session::Role;
    ///
    /// let msg = ChatMessage::system("You are a travel guide");
    /// assert_eq!(msg.role, Role::System);
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Streamed completion reply
///
/// A finite, non-restartable sequence of text fragments in arrival
/// order. The final reply text is the concatenation of all `Ok`
/// fragments; an `Err` item ends the stream and the turn attempt.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Provider trait for streaming completion services
///
/// # Examples
///
/// ```
/// use waypoint::providers::{ChatMessage, CompletionStream, Provider};
/// use waypoint::error::Result;
/// use async_trait::async_trait;
/// use futures::{stream, StreamExt};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl Provider for MyProvider {
///     async fn stream_chat(&self, _messages: &[ChatMessage]) -> Result<CompletionStream> {
///         let fragments: Vec<Result<String>> = vec![Ok("Hello".to_string())];
///         Ok(Box::pin(stream::iter(fragments)))
///     }
///
///     fn model(&self) -> &str {
///         "my-model"
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let provider = MyProvider;
/// let mut stream = provider
///     .stream_chat(&[ChatMessage::user("hi")])
///     .await
///     .unwrap();
///
/// let mut reply = String::new();
/// while let Some(fragment) = stream.next().await {
///     reply.push_str(&fragment.unwrap());
/// }
/// assert_eq!(reply, "Hello");
/// # });
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Sends the message list and returns the streamed reply
    ///
    /// # Arguments
    ///
    /// * `messages` - Full request payload, system instruction first
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be constructed or the
    /// service rejects it before any output is produced. Mid-stream
    /// failures surface as an `Err` item in the returned stream.
    async fn stream_chat(&self, messages: &[ChatMessage]) -> Result<CompletionStream>;

    /// Returns the model identifier this provider sends requests to
    fn model(&self) -> &str;
}
