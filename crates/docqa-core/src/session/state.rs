//! Session lifecycle state.

use serde::{Deserialize, Serialize};

/// Where a session is in its upload / chat lifecycle.
///
/// ```text
/// Idle ──submit_file──▶ Uploading ──ok──▶ Ready ⇄ AwaitingAnswer
///                          │
///                          └──err──▶ Error ──submit_file──▶ Uploading
/// ```
///
/// `Error` behaves like `Idle`: no document, uploads allowed, questions not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No document yet.
    #[default]
    Idle,
    /// A document upload is in flight.
    Uploading,
    /// A document is loaded and questions are accepted.
    Ready,
    /// A question has been sent and the answer is pending.
    AwaitingAnswer,
    /// The last upload failed.
    Error,
}

impl SessionState {
    /// True while a service call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::AwaitingAnswer)
    }

    /// True when a new file may be submitted.
    pub fn accepts_upload(&self) -> bool {
        matches!(self, Self::Idle | Self::Ready | Self::Error)
    }

    /// True when a question may be submitted.
    pub fn accepts_question(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
