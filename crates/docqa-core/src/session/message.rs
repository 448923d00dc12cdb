//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including roles and message content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
    /// System-generated message.
    System,
}

impl MessageRole {
    /// Lowercase wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a system message reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemMessageKind {
    /// A document finished processing and the chat is ready.
    DocumentProcessed,
    /// The document service rejected or failed the upload.
    UploadFailed,
    /// The question-answering service failed.
    QueryFailed,
}

impl SystemMessageKind {
    /// Whether the message reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::UploadFailed | Self::QueryFailed)
    }
}

/// A single message in a conversation history.
///
/// Messages are appended by the session and never mutated; `sequence` is
/// assigned on append and strictly ascends across the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Position in the session log, starting at 0.
    pub sequence: u64,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
    /// Set on system messages only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_kind: Option<SystemMessageKind>,
}

impl ConversationMessage {
    /// Whether this is an error report.
    pub fn is_error(&self) -> bool {
        self.system_kind.is_some_and(|kind| kind.is_error())
    }
}
