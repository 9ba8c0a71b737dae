//! LlmProvider trait definition.
//!
//! Uses RPITIT for `complete`, so implementations are plain `async fn`s.

use kleinbot_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// The delegated AI collaborator.
///
/// Implementations live in kleinbot-infra (e.g. `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
