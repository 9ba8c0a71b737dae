//! Turns a classified [`Reply`] into something deliverable.
//!
//! Synthesis never fails: every collaborator error degrades to a fixed
//! apology text, which then goes through post-processing like any other
//! text reply.

use std::sync::Arc;

use tracing::{Instrument, debug, info_span, warn};

use kleinbot_types::config::LlmConfig;
use kleinbot_types::error::SpeechError;
use kleinbot_types::llm::LlmError;
use kleinbot_types::reply::{PromptContext, QUERY_PLACEHOLDER, Reply, ReplyIntent, Synthesized};

use crate::llm::LlmProvider;
use crate::messenger::Messenger;
use crate::speech::SpeechSynthesizer;

use super::prompt::build_request;
use super::texts;

/// Deterministic length cap for model output.
///
/// Text longer than `max_reply_chars` keeps its first `truncate_lines`
/// lines, is cut to `truncate_chars` characters and ends with `…`.
pub fn truncate_reply(text: &str, config: &LlmConfig) -> String {
    if text.chars().count() <= config.max_reply_chars {
        return text.to_string();
    }
    let head = text
        .lines()
        .take(config.truncate_lines)
        .collect::<Vec<_>>()
        .join("\n");
    let cut: String = head.chars().take(config.truncate_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Render an image-search link reply.
pub fn render_link(template: &str, query: &str) -> String {
    let url = template.replace(QUERY_PLACEHOLDER, &urlencoding::encode(query));
    format!("🔎 Here are some \"{query}\" pictures for you:\n{url}")
}

/// Join a fixed opening with the model's continuation. A continuation that
/// repeats the opening has it removed.
fn continue_stub(stub: &str, continuation: &str) -> String {
    let rest = continuation
        .strip_prefix(stub)
        .unwrap_or(continuation)
        .trim();
    if rest.is_empty() {
        format!("{stub} {}", texts::CREATOR_CLAIM_ENDING)
    } else {
        format!("{stub} {rest}")
    }
}

pub struct Synthesizer<L, M, T> {
    llm: Arc<L>,
    messenger: Arc<M>,
    speech: Arc<T>,
    config: LlmConfig,
}

impl<L, M, T> Synthesizer<L, M, T>
where
    L: LlmProvider,
    M: Messenger,
    T: SpeechSynthesizer,
{
    pub fn new(llm: Arc<L>, messenger: Arc<M>, speech: Arc<T>, config: LlmConfig) -> Self {
        Self {
            llm,
            messenger,
            speech,
            config,
        }
    }

    /// Produce the reply. `history` is the rendered session context and
    /// `comfort_active` whether comfort mode is on at synthesis time.
    pub async fn synthesize(&self, reply: &Reply, history: &str, comfort_active: bool) -> Synthesized {
        match &reply.intent {
            ReplyIntent::StaticText { text } => text_of(reply, text.clone()),
            ReplyIntent::Refusal { reason } => text_of(reply, reason.clone()),
            ReplyIntent::Link { template, query } => text_of(reply, render_link(template, query)),
            ReplyIntent::DelegatedAi { context } => {
                self.delegate(reply, context, history, comfort_active).await
            }
            ReplyIntent::Voice { text } => self.speak(text).await,
        }
    }

    async fn complete(
        &self,
        context: &PromptContext,
        history: &str,
        comfort_active: bool,
    ) -> Result<String, LlmError> {
        let request = build_request(&self.config, context, history, comfort_active);

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.llm.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.messages = request.messages.len(),
        );

        let response = self.llm.complete(&request).instrument(span).await?;
        debug!(
            response_id = %response.id,
            stop_reason = %response.stop_reason,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );

        let content = response.content.trim();
        if content.is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(content.to_string())
    }

    async fn delegate(
        &self,
        reply: &Reply,
        context: &PromptContext,
        history: &str,
        comfort_active: bool,
    ) -> Synthesized {
        let completion = self.complete(context, history, comfort_active).await;

        if let Some(stub) = &context.continuation_stub {
            let text = match completion {
                Ok(continuation) => continue_stub(stub, &continuation),
                Err(e) => {
                    warn!(error = %e, "continuation failed, using fixed ending");
                    format!("{stub} {}", texts::CREATOR_CLAIM_ENDING)
                }
            };
            return text_of(reply, truncate_reply(&text, &self.config));
        }

        match completion {
            Ok(text) => {
                let text = truncate_reply(&text, &self.config);
                if text == texts::HELP_TEXT {
                    // The model reproduced the help block; treat it as help.
                    return Synthesized::Text {
                        text,
                        suppress_footer: true,
                        personalize: false,
                    };
                }
                text_of(reply, text)
            }
            Err(e) => {
                warn!(error = %e, provider = self.llm.name(), "completion failed, using fallback");
                text_of(reply, texts::LLM_FALLBACK.to_string())
            }
        }
    }

    async fn upload_speech(&self, text: &str) -> Result<String, SpeechError> {
        let clip = self.speech.synthesize(text).await?;
        if clip.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        debug!(bytes = clip.len(), "speech synthesized");
        Ok(self.messenger.upload_audio(&clip).await?)
    }

    async fn speak(&self, text: &str) -> Synthesized {
        match self.upload_speech(text).await {
            Ok(attachment_id) => Synthesized::Audio {
                attachment_id,
                transcript: text.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "voice reply failed, falling back to text");
                Synthesized::Text {
                    text: texts::VOICE_FALLBACK.to_string(),
                    suppress_footer: false,
                    personalize: false,
                }
            }
        }
    }
}

fn text_of(reply: &Reply, text: String) -> Synthesized {
    Synthesized::Text {
        text,
        suppress_footer: reply.suppress_footer,
        personalize: reply.personalize,
    }
}
