//! Conversation transcript data model
//!
//! A [`Session`] is the ordered, append-only list of user and assistant
//! turns for one interactive run. The system instruction is never stored
//! here; it is synthesized fresh for every outbound request so the sent
//! payload cannot drift from the visible history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Synthesized persona/behavior directive, never persisted in a Session
    System,
    /// End-user input
    User,
    /// Model reply
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversational entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the turn's author
    pub role: Role,
    /// Text content of the turn
    pub content: String,
}

impl Turn {
    /// Creates a new user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint::session::{Role, Turn};
    ///
    /// let turn = Turn::user("안녕하세요");
    /// assert_eq!(turn.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a new system turn
    ///
    /// System turns are built per-request from the fixed instruction and
    /// are never appended to a [`Session`].
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Ordered, append-only collection of user/assistant turns
///
/// A Session lives for the duration of the process; there is no
/// persistence across restarts. Turns are only ever appended, in
/// chronological order. There is deliberately no way to store a system
/// turn: the system instruction belongs to the request, not the
/// transcript.
///
/// # Examples
///
/// ```
/// use waypoint::session::Session;
///
/// let mut session = Session::new();
/// session.push_user("오사카 맛집 추천");
/// session.push_assistant("1. 도톤보리 ...");
/// assert_eq!(session.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    turns: Vec<Turn>,
}

impl Session {
    /// Creates an empty session
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Appends a user turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    /// Appends an assistant turn
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    /// Returns all turns in chronological order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the most recent turn, if any
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turns have been recorded
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
