//! Single-document chat session state machine.
//!
//! [`SessionController`] owns the [`Session`] and the two collaborator
//! services. Each submission moves the session through a busy state and back
//! to an interactive one, publishing a [`SessionSnapshot`] on every
//! transition for presentation layers to render.

use docqa_core::session::{
    ConversationMessage, MessageRole, Session, SessionSnapshot, SessionState, SystemMessageKind,
};
use docqa_core::{
    Answer, Document, DocumentFile, DocumentService, QaService, QuestionRequest, ServiceError,
};
use std::sync::Arc;
use tokio::sync::watch;

use crate::factory::Services;

/// Transcript text recorded when an upload future is dropped before the
/// service answered.
const UPLOAD_ABANDONED: &str = "Error processing document: Upload was cancelled";
/// Transcript text recorded when a question future is dropped before the
/// service answered.
const QUESTION_ABANDONED: &str = "Error: Question was cancelled";

/// Why a submission was refused without touching the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The question was empty after trimming.
    EmptyQuestion,
    /// No document has been processed yet (or the last upload failed).
    NoDocument,
}

/// Result of [`SessionController::submit_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The document was processed and the session is ready for questions.
    Processed(Document),
    /// The document service failed; the session is in `Error`.
    Failed(ServiceError),
}

/// Result of [`SessionController::submit_question`].
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionOutcome {
    /// The answer was appended to the transcript.
    Answered(Answer),
    /// The Q&A service failed; the error was appended and the chat stays usable.
    Failed(ServiceError),
    /// Nothing happened.
    Rejected(RejectReason),
}

/// Drives a single-document chat session.
///
/// The `SessionController` handles:
/// - Uploading a document through the [`DocumentService`]
/// - Asking questions through the [`QaService`] with the prior exchange as context
/// - Publishing a [`SessionSnapshot`] after every state transition
///
/// Service failures never escape: they are turned into system messages and the
/// controller always ends in an interactive state. Mutating operations take
/// `&mut self`, so at most one service call is outstanding and a submission
/// can never observe a busy session. If a submission future is dropped while
/// its service call is pending, the call is recorded as failed: uploads end
/// in `Error`, questions return to `Ready`.
pub struct SessionController {
    session: Session,
    document_service: Arc<dyn DocumentService>,
    qa_service: Arc<dyn QaService>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    /// Creates an idle controller over the given collaborators.
    pub fn new(document_service: Arc<dyn DocumentService>, qa_service: Arc<dyn QaService>) -> Self {
        let session = Session::new();
        let (snapshots, _) = watch::channel(session.snapshot());
        Self {
            session,
            document_service,
            qa_service,
            snapshots,
        }
    }

    /// Creates an idle controller from a wired service pair.
    pub fn from_services(services: Services) -> Self {
        Self::new(services.document, services.qa)
    }

    /// Subscribes to snapshots; the receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn document(&self) -> Option<&Document> {
        self.session.document()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        self.session.messages()
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// True when [`submit_question`](Self::submit_question) would be accepted.
    pub fn can_ask(&self) -> bool {
        self.session.can_ask()
    }

    /// Uploads a file and replaces the current document.
    ///
    /// Always accepted: every state reachable between calls (`Idle`, `Error`,
    /// `Ready`) takes uploads. The previous document is dropped as soon as the
    /// upload starts.
    pub async fn submit_file(&mut self, file: DocumentFile) -> UploadOutcome {
        debug_assert!(self.session.state().accepts_upload());

        if let Some(previous) = self.session.clear_document() {
            tracing::debug!(document_id = %previous.id, "Replacing document");
        }
        self.transition(SessionState::Uploading);

        let result = {
            let pending = PendingCall::new(
                &mut self.session,
                &self.snapshots,
                SessionState::Error,
                SystemMessageKind::UploadFailed,
                UPLOAD_ABANDONED,
            );
            let result = self.document_service.upload(&file).await;
            pending.complete();
            result
        };

        match result {
            Ok(receipt) => {
                let document = receipt.into_document(file.name.clone());
                tracing::info!(
                    document_id = %document.id,
                    chunks = document.chunk_count,
                    "Document \"{}\" processed",
                    document.display_name
                );

                self.session.push_system(
                    SystemMessageKind::DocumentProcessed,
                    processed_message(&document),
                );
                self.session.set_document(document.clone());
                self.transition(SessionState::Ready);
                UploadOutcome::Processed(document)
            }
            Err(err) => {
                tracing::warn!("Upload of \"{}\" failed: {}", file.name, err);
                self.session.push_system(
                    SystemMessageKind::UploadFailed,
                    format!("Error processing document: {}", err.message()),
                );
                self.transition(SessionState::Error);
                UploadOutcome::Failed(err)
            }
        }
    }

    /// Asks a question about the current document.
    ///
    /// Blank questions and questions outside `Ready` are rejected without
    /// touching the transcript or calling the service.
    pub async fn submit_question(&mut self, text: &str) -> QuestionOutcome {
        if text.trim().is_empty() {
            tracing::debug!("Question rejected: empty");
            return QuestionOutcome::Rejected(RejectReason::EmptyQuestion);
        }
        let document_id = match self.session.document() {
            Some(document) if self.session.can_ask() => document.id.clone(),
            _ => {
                tracing::debug!(state = ?self.session.state(), "Question rejected: no document");
                return QuestionOutcome::Rejected(RejectReason::NoDocument);
            }
        };

        // History is taken before the question is appended.
        let request = QuestionRequest {
            document_id,
            question: text.to_string(),
            chat_history: self.session.chat_history(),
        };

        self.session.push_message(MessageRole::User, text, None);
        self.transition(SessionState::AwaitingAnswer);

        let result = {
            let pending = PendingCall::new(
                &mut self.session,
                &self.snapshots,
                SessionState::Ready,
                SystemMessageKind::QueryFailed,
                QUESTION_ABANDONED,
            );
            let result = self.qa_service.ask(&request).await;
            pending.complete();
            result
        };

        let outcome = match result {
            Ok(answer) => {
                tracing::info!(
                    processing_time = answer.processing_time,
                    context = answer.context.len(),
                    "Question answered"
                );
                self.session
                    .push_message(MessageRole::Assistant, answer.answer.clone(), None);
                QuestionOutcome::Answered(answer)
            }
            Err(err) => {
                tracing::warn!("Question failed: {}", err);
                self.session.push_system(
                    SystemMessageKind::QueryFailed,
                    format!("Error: {}", err.message()),
                );
                QuestionOutcome::Failed(err)
            }
        };

        self.transition(SessionState::Ready);
        outcome
    }

    fn transition(&mut self, state: SessionState) {
        publish(&mut self.session, &self.snapshots, state);
    }
}

fn publish(session: &mut Session, snapshots: &watch::Sender<SessionSnapshot>, state: SessionState) {
    tracing::debug!(from = ?session.state(), to = ?state, "Session transition");
    session.set_state(state);
    snapshots.send_replace(session.snapshot());
}

/// Guards a pending service call.
///
/// Dropped without [`complete`](Self::complete), it appends the abandonment
/// message and moves the session to its fallback state.
struct PendingCall<'a> {
    session: &'a mut Session,
    snapshots: &'a watch::Sender<SessionSnapshot>,
    fallback: SessionState,
    kind: SystemMessageKind,
    message: &'static str,
    done: bool,
}

impl<'a> PendingCall<'a> {
    fn new(
        session: &'a mut Session,
        snapshots: &'a watch::Sender<SessionSnapshot>,
        fallback: SessionState,
        kind: SystemMessageKind,
        message: &'static str,
    ) -> Self {
        Self {
            session,
            snapshots,
            fallback,
            kind,
            message,
            done: false,
        }
    }

    fn complete(mut self) {
        self.done = true;
    }
}

impl Drop for PendingCall<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        tracing::warn!(state = ?self.session.state(), "Service call abandoned");
        self.session.push_system(self.kind, self.message);
        publish(self.session, self.snapshots, self.fallback);
    }
}

fn processed_message(document: &Document) -> String {
    format!(
        "Document \"{}\" has been processed with {} chunks. \
         You can now ask questions about its content.",
        document.display_name, document.chunk_count
    )
}
