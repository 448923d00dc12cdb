//! Collaborator contracts.
//!
//! The session controller talks to two external services: one that ingests a
//! document, one that answers questions about it. Both are abstract here so the
//! controller can run against a simulated implementation or a real HTTP
//! backend interchangeably.

use crate::document::{Document, DocumentFile};
use crate::error::ServiceError;
use crate::session::MessageRole;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response of the document upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub document_id: String,
    pub filename: String,
    pub num_chunks: u32,
    #[serde(default)]
    pub status: String,
}

impl UploadReceipt {
    /// Converts the receipt into the session's document, shown under `display_name`.
    pub fn into_document(self, display_name: impl Into<String>) -> Document {
        Document {
            id: self.document_id,
            display_name: display_name.into(),
            chunk_count: self.num_chunks,
        }
    }
}

/// One prior turn of the conversation, sent as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

/// Body of a question-answering request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub document_id: String,
    pub question: String,
    /// Full prior exchange, oldest first; the service keeps no state between calls.
    #[serde(default)]
    pub chat_history: Vec<HistoryEntry>,
}

/// Response of the question-answering endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Document snippets the answer was grounded on.
    #[serde(default)]
    pub context: Vec<String>,
    /// Server-side latency in seconds.
    #[serde(default)]
    pub processing_time: f64,
}

/// Ingests one document and reports how it was chunked.
///
/// Implementations should not leave partial or duplicate documents behind
/// when a call fails and the user retries.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Uploads a file for processing.
    ///
    /// # Returns
    ///
    /// - `Ok(UploadReceipt)`: the document was processed
    /// - `Err(ServiceError::Upload)`: transport or server failure
    async fn upload(&self, file: &DocumentFile) -> Result<UploadReceipt, ServiceError>;
}

/// Answers questions about a previously uploaded document.
#[async_trait]
pub trait QaService: Send + Sync {
    /// Asks a question with the full conversation so far.
    ///
    /// # Returns
    ///
    /// - `Ok(Answer)`: the generated answer
    /// - `Err(ServiceError::Query)`: transport or server failure
    async fn ask(&self, request: &QuestionRequest) -> Result<Answer, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_request_wire_shape() {
        let request = QuestionRequest {
            document_id: "doc_abc".to_string(),
            question: "Who wrote it?".to_string(),
            chat_history: vec![
                HistoryEntry {
                    role: MessageRole::User,
                    content: "hi".to_string(),
                },
                HistoryEntry {
                    role: MessageRole::Assistant,
                    content: "hello".to_string(),
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "document_id": "doc_abc",
                "question": "Who wrote it?",
                "chat_history": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }

    #[test]
    fn test_answer_tolerates_missing_optional_fields() {
        let answer: Answer = serde_json::from_str(r#"{"answer": "X"}"#).unwrap();
        assert_eq!(answer.answer, "X");
        assert!(answer.context.is_empty());
        assert_eq!(answer.processing_time, 0.0);
    }

    #[test]
    fn test_receipt_into_document() {
        let receipt: UploadReceipt = serde_json::from_str(
            r#"{"document_id":"doc_abc","filename":"report.txt","num_chunks":15,"status":"processed"}"#,
        )
        .unwrap();
        let document = receipt.into_document("report.txt");
        assert_eq!(document.id, "doc_abc");
        assert_eq!(document.display_name, "report.txt");
        assert_eq!(document.chunk_count, 15);
    }
}
