//! Conversation message types.

use serde::{Deserialize, Serialize};

/// The role of a message participant.
///
/// Serialized in lowercase, matching the chat completions wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A system message (instructions).
    System,
    /// A human user.
    User,
    /// An AI assistant.
    Assistant,
}

impl Role {
    /// The wire name of this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation.
///
/// Messages are ordered chronologically within a conversation. Once a
/// message is part of the history it is not edited, with one exception:
/// the assistant placeholder of an in-flight stream grows by appending
/// deltas to [`Message::content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message author.
    pub role: Role,
    /// The text content of this message.
    pub content: String,
    /// Set on an assistant reply whose request failed.
    ///
    /// Kept in stored history so a failed turn can be shown as one, and
    /// never sent to the provider. Omitted from JSON when false.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Message {
    /// Create a message with the given role and content.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            error: false,
        }
    }

    /// Create a user message.
    ///
    /// # Example
    ///
    /// ```
    /// use unai_types::Message;
    /// let msg = Message::user("What is Rust?");
    /// ```
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create an assistant reply for a failed request.
    #[must_use]
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            error: true,
            ..Self::assistant(text)
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }
}
