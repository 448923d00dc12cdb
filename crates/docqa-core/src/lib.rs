//! Domain layer for DocQA.
//!
//! Holds the session model, the collaborator contracts the session controller
//! depends on, and the shared error and configuration types.

pub mod config;
pub mod document;
pub mod error;
pub mod service;
pub mod session;

// Re-export common types
pub use config::{ClientConfig, ServiceMode, SimulationConfig};
pub use document::{Document, DocumentFile, DocumentKind};
pub use error::{DocQaError, ServiceError};
pub use service::{
    Answer, DocumentService, HistoryEntry, QaService, QuestionRequest, UploadReceipt,
};
