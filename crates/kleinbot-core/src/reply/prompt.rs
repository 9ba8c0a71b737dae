//! Chat-completion request assembly for delegated replies.
//!
//! Message order is fixed: persona (with the comfort addendum while comfort
//! mode is active), an optional memory block built from recent turns, an
//! optional continuation instruction, and finally the user message.

use kleinbot_types::config::LlmConfig;
use kleinbot_types::llm::{CompletionRequest, Message};
use kleinbot_types::reply::PromptContext;

use super::texts;

/// The system persona, with the comfort addendum when `comfort_active`.
pub fn persona(comfort_active: bool) -> String {
    let mut prompt = String::from(texts::PERSONA_PROMPT);
    if comfort_active {
        prompt.push_str("\n\n");
        prompt.push_str(texts::COMFORT_PROMPT);
    }
    prompt.push_str("\n\n");
    prompt.push_str(texts::HUMOR_PROMPT);
    prompt
}

pub fn build_request(
    config: &LlmConfig,
    context: &PromptContext,
    history: &str,
    comfort_active: bool,
) -> CompletionRequest {
    let mut messages = vec![Message::system(persona(comfort_active))];

    let history = history.trim();
    if !history.is_empty() {
        messages.push(Message::system(format!(
            "{}\n{history}",
            texts::MEMORY_PROMPT_HEADER
        )));
    }

    if let Some(stub) = &context.continuation_stub {
        messages.push(Message::system(format!(
            "{}\n\n{stub}",
            texts::CONTINUATION_PROMPT
        )));
    }

    messages.push(Message::user(context.user_message.clone()));

    CompletionRequest {
        model: config.model.clone(),
        messages,
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kleinbot_types::llm::MessageRole;

    #[test]
    fn minimal_request_has_persona_and_user() {
        let request = build_request(&LlmConfig::default(), &PromptContext::new("hi"), "", false);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 200);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert!(request.messages[0].content.contains(texts::PERSONA_PROMPT));
        assert!(!request.messages[0].content.contains(texts::COMFORT_PROMPT));
        assert_eq!(request.messages[1], Message::user("hi"));
    }

    #[test]
    fn comfort_addendum_only_when_active() {
        let request = build_request(&LlmConfig::default(), &PromptContext::new("hi"), "", true);
        assert!(request.messages[0].content.contains(texts::COMFORT_PROMPT));
        assert!(request.messages[0].content.contains(texts::HUMOR_PROMPT));
    }

    #[test]
    fn memory_block_precedes_user_message() {
        let history = "User: hello\nBot: hi there";
        let request = build_request(&LlmConfig::default(), &PromptContext::new("again"), history, false);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, MessageRole::System);
        assert!(request.messages[1].content.starts_with(texts::MEMORY_PROMPT_HEADER));
        assert!(request.messages[1].content.ends_with(history));
        assert_eq!(request.messages[2].content, "again");
    }

    #[test]
    fn continuation_stub_is_given_to_model() {
        let context = PromptContext::continuing("i made you", texts::CREATOR_CLAIM_STUB);
        let request = build_request(&LlmConfig::default(), &context, "", false);
        assert_eq!(request.messages.len(), 3);
        assert!(request.messages[1].content.contains(texts::CREATOR_CLAIM_STUB));
        assert_eq!(request.messages[2].content, "i made you");
    }

    #[test]
    fn model_settings_follow_config() {
        let config = LlmConfig {
            model: "local-model".into(),
            max_tokens: 64,
            temperature: 0.2,
            ..LlmConfig::default()
        };
        let request = build_request(&config, &PromptContext::new("x"), "", false);
        assert_eq!(request.model, "local-model");
        assert_eq!(request.max_tokens, 64);
        assert_eq!(request.temperature, Some(0.2));
    }
}
