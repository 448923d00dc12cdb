//! Collaborator implementations for DocQA.
//!
//! Both types here implement [`DocumentService`](docqa_core::DocumentService)
//! and [`QaService`](docqa_core::QaService):
//!
//! - [`HttpDocQaClient`] talks to the real backend.
//! - [`SimulatedDocQaService`] answers locally with canned responses.

pub mod http_client;
pub mod simulated;

pub use http_client::HttpDocQaClient;
pub use simulated::SimulatedDocQaService;
