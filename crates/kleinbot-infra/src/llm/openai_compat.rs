//! OpenAI-compatible chat-completion provider.
//!
//! Uses [`async_openai`] for the request/response types, with a configurable
//! base URL so any OpenAI-compatible endpoint works.

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, FinishReason,
};
use secrecy::{ExposeSecret, SecretString};

use kleinbot_core::llm::LlmProvider;
use kleinbot_types::config::LlmConfig;
use kleinbot_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, MessageRole, StopReason, Usage,
};

/// Configuration for an [`OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name used in logs and spans.
    pub provider_name: String,
    /// API base, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: SecretString,
    /// Used when a request leaves its model empty.
    pub model: String,
    /// Bounds each HTTP attempt and the whole call including retries.
    pub timeout: Duration,
}

impl OpenAiCompatConfig {
    pub fn from_llm_config(config: &LlmConfig, api_key: SecretString) -> Self {
        Self {
            provider_name: "openai".into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Provider for any OpenAI-compatible chat completions API.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
    timeout: Duration,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, LlmError> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(http),
            provider_name: config.provider_name,
            model: config.model,
            timeout: config.timeout,
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request
            .messages
            .iter()
            .map(|msg| match msg.role {
                MessageRole::System => {
                    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                        content: ChatCompletionRequestSystemMessageContent::Text(
                            msg.content.clone(),
                        ),
                        name: None,
                    })
                }
                MessageRole::User => {
                    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                        content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                        name: None,
                    })
                }
                MessageRole::Assistant => {
                    #[allow(deprecated)]
                    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                        content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                            msg.content.clone(),
                        )),
                        refusal: None,
                        name: None,
                        audio: None,
                        tool_calls: None,
                        function_call: None,
                    })
                }
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let chat = self.client.chat();
        let call = chat.create(self.build_request(request));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| LlmError::Timeout)?
            .map_err(map_openai_error)?;

        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let stop_reason = choice
            .and_then(|c| c.finish_reason.as_ref())
            .map(|fr| match fr {
                FinishReason::Length => StopReason::MaxTokens,
                FinishReason::ContentFilter => StopReason::ContentFilter,
                _ => StopReason::EndTurn,
            })
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited
            } else {
                LlmError::Provider {
                    message: api_err.message.clone(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) if reqwest_err.is_timeout() => LlmError::Timeout,
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited,
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}
