//! The per-message pipeline.

pub mod service;

pub use service::{ConversationService, TurnOutcome};
