//! Simulated document and Q&A services.
//!
//! Stands in for the backend during development and demos: uploads return a
//! random document id and chunk count, questions are answered by keyword
//! matching on the question text. The document's content is never looked at.

use async_trait::async_trait;
use docqa_core::{
    Answer, DocumentFile, DocumentService, QaService, QuestionRequest, ServiceError,
    SimulationConfig, UploadReceipt,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ID_LENGTH: usize = 9;

const ARCHITECTURE_ANSWER: &str = "This system uses a Retrieval-Augmented Generation (RAG) architecture. It processes documents by splitting them into chunks, generating embeddings for semantic search, and then retrieves relevant context when answering questions. The LLM combines this retrieved context with the conversation history to generate accurate, contextually relevant responses.";
const AUTHOR_ANSWER: &str = "Based on the document analysis, the author appears to be Sarah Johnson, a data scientist with 8 years of experience in natural language processing and machine learning applications.";
const SUMMARY_ANSWER: &str = "The document discusses advances in large language models, focusing on three key areas: 1) Improvements in context window size, 2) Multimodal capabilities integrating text with images and audio, and 3) Fine-tuning techniques for specialized applications. It concludes with predictions about future developments in AI assistants and their impact on knowledge work.";
const CONCLUSION_ANSWER: &str = "The document concludes that while LLMs have made remarkable progress, challenges remain in areas of factuality, reasoning, and alignment with human values. It suggests that hybrid systems combining neural approaches with symbolic reasoning may offer the most promising path forward for the next generation of AI systems.";
const GENERIC_ANSWER: &str = "Based on the document content, I can tell you that this question relates to advanced language models and their applications. The document specifically mentions that these technologies are transforming how we interact with information, creating more intuitive and context-aware systems. Would you like me to elaborate on any specific aspect mentioned in the document?";

const SIMULATED_CONTEXT: [&str; 2] = [
    "This is a simulated context chunk for testing purposes.",
    "Another simulated context chunk with relevant information.",
];

/// Keyword routes, checked in order; the first hit wins.
const ANSWER_ROUTES: &[(&[&str], &str)] = &[
    (&["architecture", "how does this work"], ARCHITECTURE_ANSWER),
    (&["author", "who wrote"], AUTHOR_ANSWER),
    (&["summary", "main points"], SUMMARY_ANSWER),
    (&["conclusion", "findings"], CONCLUSION_ANSWER),
];

/// Picks the canned answer for a question.
pub fn canned_answer(question: &str) -> &'static str {
    let lower = question.to_lowercase();
    ANSWER_ROUTES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, answer)| *answer)
        .unwrap_or(GENERIC_ANSWER)
}

/// In-memory implementation of both collaborator contracts.
pub struct SimulatedDocQaService {
    config: SimulationConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedDocQaService {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// A service with no artificial delays.
    pub fn instant() -> Self {
        Self::new(SimulationConfig::instant())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl Default for SimulatedDocQaService {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

fn random_document_id(rng: &mut StdRng) -> String {
    let suffix: String = (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("doc_{suffix}")
}

#[async_trait]
impl DocumentService for SimulatedDocQaService {
    async fn upload(&self, file: &DocumentFile) -> Result<UploadReceipt, ServiceError> {
        tokio::time::sleep(self.config.upload_delay()).await;

        let (document_id, num_chunks) = {
            let mut rng = self.rng.lock().await;
            (random_document_id(&mut rng), rng.gen_range(10..=29u32))
        };

        tracing::debug!(
            document_id = %document_id,
            num_chunks,
            "Simulated upload of {}",
            file.name
        );

        Ok(UploadReceipt {
            document_id,
            filename: file.name.clone(),
            num_chunks,
            status: "processed".to_string(),
        })
    }
}

#[async_trait]
impl QaService for SimulatedDocQaService {
    async fn ask(&self, request: &QuestionRequest) -> Result<Answer, ServiceError> {
        tokio::time::sleep(self.config.answer_delay()).await;

        let processing_time = {
            let mut rng = self.rng.lock().await;
            rng.gen_range(0.2_f64..0.7)
        };

        Ok(Answer {
            answer: canned_answer(&request.question).to_string(),
            context: SIMULATED_CONTEXT.iter().map(|s| s.to_string()).collect(),
            processing_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> QuestionRequest {
        QuestionRequest {
            document_id: "doc_test".to_string(),
            question: text.to_string(),
            chat_history: Vec::new(),
        }
    }

    #[test]
    fn test_canned_answer_routes() {
        assert_eq!(canned_answer("Describe the ARCHITECTURE"), ARCHITECTURE_ANSWER);
        assert_eq!(canned_answer("how does this work?"), ARCHITECTURE_ANSWER);
        assert_eq!(canned_answer("Who wrote this?"), AUTHOR_ANSWER);
        assert_eq!(canned_answer("What is the summary?"), SUMMARY_ANSWER);
        assert_eq!(canned_answer("List the main points"), SUMMARY_ANSWER);
        assert_eq!(canned_answer("Key findings?"), CONCLUSION_ANSWER);
        assert_eq!(canned_answer("What's the weather"), GENERIC_ANSWER);
    }

    #[test]
    fn test_first_matching_route_wins() {
        // "author" is checked before "summary"
        assert_eq!(canned_answer("summary of the author"), AUTHOR_ANSWER);
    }

    #[tokio::test]
    async fn test_upload_receipt_shape() {
        let service = SimulatedDocQaService::instant();
        let file = DocumentFile::from_bytes("report.txt", b"content".to_vec());

        let receipt = service.upload(&file).await.unwrap();
        assert!(receipt.document_id.starts_with("doc_"));
        assert_eq!(receipt.document_id.len(), 4 + ID_LENGTH);
        assert!(receipt.document_id[4..]
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        assert_eq!(receipt.filename, "report.txt");
        assert!((10..=29).contains(&receipt.num_chunks));
        assert_eq!(receipt.status, "processed");
    }

    #[tokio::test]
    async fn test_seeded_uploads_are_reproducible() {
        let config = SimulationConfig {
            seed: Some(42),
            ..SimulationConfig::instant()
        };
        let file = DocumentFile::from_bytes("a.pdf", Vec::new());

        let first = SimulatedDocQaService::new(config.clone()).upload(&file).await.unwrap();
        let second = SimulatedDocQaService::new(config).upload(&file).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_ask_returns_context_and_latency() {
        let service = SimulatedDocQaService::instant();
        let answer = service.ask(&question("what are the findings")).await.unwrap();

        assert_eq!(answer.answer, CONCLUSION_ANSWER);
        assert_eq!(answer.context.len(), 2);
        assert!((0.2..0.7).contains(&answer.processing_time));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_waits_for_configured_delay() {
        let service = SimulatedDocQaService::new(SimulationConfig {
            answer_delay_ms: 2000,
            ..SimulationConfig::instant()
        });

        let started = tokio::time::Instant::now();
        service.ask(&question("hello")).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(2000));
    }
}
