//! Session domain module.
//!
//! This module contains the single-document chat session: its message log,
//! its lifecycle state, and the immutable snapshots handed to presentation
//! layers.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `state`: Lifecycle state (`SessionState`)
//! - `model`: The session itself (`Session`) and its `SessionSnapshot`
//!
//! # Usage
//!
//! ```ignore
//! use docqa_core::session::{Session, SessionSnapshot, SessionState};
//! use docqa_core::session::{ConversationMessage, MessageRole};
//! ```

mod message;
mod model;
mod state;

// Re-export public API
pub use message::{ConversationMessage, MessageRole, SystemMessageKind};
pub use model::{Session, SessionSnapshot};
pub use state::SessionState;
