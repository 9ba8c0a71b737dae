//! Chat-completion port.

pub mod provider;

pub use provider::LlmProvider;
