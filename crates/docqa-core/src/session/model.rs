//! Session domain model.
//!
//! This module contains the core Session entity: one optional document, an
//! append-only message log, and the lifecycle state.

use super::message::{ConversationMessage, MessageRole, SystemMessageKind};
use super::state::SessionState;
use crate::document::Document;
use crate::service::HistoryEntry;
use serde::{Deserialize, Serialize};

/// A single-document chat session.
///
/// Fields are private so the message log can only grow through
/// [`Session::push_message`], which assigns sequence numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    state: SessionState,
    document: Option<Document>,
    messages: Vec<ConversationMessage>,
    next_sequence: u64,
}

impl Session {
    /// Creates an idle session with no document and no messages.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// True while a service call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// A question may be submitted only with a document loaded and no answer pending.
    pub fn can_ask(&self) -> bool {
        self.state.accepts_question() && self.document.is_some()
    }

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Stores the processed document, replacing any previous one.
    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
    }

    /// Drops the current document, returning it.
    pub fn clear_document(&mut self) -> Option<Document> {
        self.document.take()
    }

    /// Appends a message and returns it.
    pub fn push_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        system_kind: Option<SystemMessageKind>,
    ) -> &ConversationMessage {
        let message = ConversationMessage {
            sequence: self.next_sequence,
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            system_kind,
        };
        self.next_sequence += 1;
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Appends a system message of the given kind.
    pub fn push_system(
        &mut self,
        kind: SystemMessageKind,
        content: impl Into<String>,
    ) -> &ConversationMessage {
        self.push_message(MessageRole::System, content, Some(kind))
    }

    /// The user/assistant exchange so far, oldest first, without system messages.
    pub fn chat_history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| HistoryEntry {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    /// Takes an immutable copy for presentation layers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            document: self.document.clone(),
            messages: self.messages.clone(),
            busy: self.is_busy(),
        }
    }
}

/// Immutable view of a session, published after every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub document: Option<Document>,
    pub messages: Vec<ConversationMessage>,
    /// True during `Uploading` and `AwaitingAnswer`.
    pub busy: bool,
}

impl SessionSnapshot {
    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }
}
