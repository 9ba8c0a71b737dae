//! Reply intents produced by trigger classification.
//!
//! A [`ReplyIntent`] says *how* a reply will be produced; a [`Reply`] wraps
//! it with the structural flags the post-processor needs, so nothing
//! downstream has to compare rendered text against known constants.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the percent-encoded query in link templates.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Inputs for a delegated chat-completion reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    /// The inbound user message, as received (trimmed).
    pub user_message: String,
    /// When set, the model only continues this sentence; the stub itself
    /// always opens the reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_stub: Option<String>,
}

impl PromptContext {
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            continuation_stub: None,
        }
    }

    pub fn continuing(user_message: impl Into<String>, stub: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            continuation_stub: Some(stub.into()),
        }
    }
}

/// How a reply is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyIntent {
    /// Literal text.
    StaticText { text: String },
    /// A search link built from `template` with the encoded `query`.
    Link { template: String, query: String },
    /// Delegate to the chat-completion collaborator.
    DelegatedAi { context: PromptContext },
    /// Speak `text` through the text-to-speech collaborator.
    Voice { text: String },
    /// Moderation refusal; never reaches an AI collaborator.
    Refusal { reason: String },
}

/// A classified reply plus post-processing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub intent: ReplyIntent,
    /// Never append the help footer (the help block itself).
    pub suppress_footer: bool,
    /// Eligible for display-name injection.
    pub personalize: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            intent: ReplyIntent::StaticText { text: text.into() },
            suppress_footer: false,
            personalize: true,
        }
    }

    /// The help block: no footer, no name prefix.
    pub fn help(text: impl Into<String>) -> Self {
        Self {
            intent: ReplyIntent::StaticText { text: text.into() },
            suppress_footer: true,
            personalize: false,
        }
    }

    pub fn link(template: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            intent: ReplyIntent::Link {
                template: template.into(),
                query: query.into(),
            },
            suppress_footer: false,
            personalize: false,
        }
    }

    pub fn delegated(context: PromptContext) -> Self {
        Self {
            intent: ReplyIntent::DelegatedAi { context },
            suppress_footer: false,
            personalize: true,
        }
    }

    pub fn voice(text: impl Into<String>) -> Self {
        Self {
            intent: ReplyIntent::Voice { text: text.into() },
            suppress_footer: true,
            personalize: false,
        }
    }

    pub fn refusal(reason: impl Into<String>) -> Self {
        Self {
            intent: ReplyIntent::Refusal {
                reason: reason.into(),
            },
            suppress_footer: false,
            personalize: false,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self.intent {
            ReplyIntent::StaticText { .. } => "static_text",
            ReplyIntent::Link { .. } => "link",
            ReplyIntent::DelegatedAi { .. } => "delegated_ai",
            ReplyIntent::Voice { .. } => "voice",
            ReplyIntent::Refusal { .. } => "refusal",
        }
    }
}

/// A synthesized reply, ready for post-processing and dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synthesized {
    Text {
        text: String,
        suppress_footer: bool,
        personalize: bool,
    },
    /// An uploaded audio attachment; `transcript` is what was spoken.
    Audio {
        attachment_id: String,
        transcript: String,
    },
}
