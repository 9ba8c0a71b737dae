//! Shared domain types for KleinBot.
//!
//! This crate contains the core domain types used across the workspace:
//! sessions and turns, reply intents, LLM request/response shapes, the
//! Messenger webhook and Send API payloads, synthesized audio, configuration and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod messenger;
pub mod reply;
pub mod session;
pub mod speech;
