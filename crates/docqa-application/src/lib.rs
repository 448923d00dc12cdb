//! Application layer for DocQA.
//!
//! This crate provides the session controller that drives the upload / chat
//! lifecycle on top of the collaborator contracts, and the factory that wires
//! collaborators from configuration.

pub mod factory;
pub mod session_controller;

pub use factory::{Services, build_services};
pub use session_controller::{QuestionOutcome, RejectReason, SessionController, UploadOutcome};
