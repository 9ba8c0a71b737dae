//! The ordered trigger table.
//!
//! Each [`TriggerRule`] pairs a predicate with a synthesizer. Rules are
//! evaluated in table order and the first match wins, so the position of a
//! rule in [`default_rules`] is its precedence.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use regex::Regex;

use kleinbot_types::reply::{PromptContext, Reply};
use kleinbot_types::session::Session;

use crate::reply::texts;

use super::moderation;
use super::normalize::NormalizedText;
use super::phrases;

/// Identifies a rule in the trigger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    Help,
    Voice,
    CreatorClaim,
    CreatorMention,
    BotMention,
    AmbiguousName,
    Moderation,
    Comfort,
    ImageSearch,
    Roast,
    WhoMadeYou,
    Default,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Help => "help",
            RuleId::Voice => "voice",
            RuleId::CreatorClaim => "creator_claim",
            RuleId::CreatorMention => "creator_mention",
            RuleId::BotMention => "bot_mention",
            RuleId::AmbiguousName => "ambiguous_name",
            RuleId::Moderation => "moderation",
            RuleId::Comfort => "comfort",
            RuleId::ImageSearch => "image_search",
            RuleId::Roast => "roast",
            RuleId::WhoMadeYou => "who_made_you",
            RuleId::Default => "default",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knobs that shape what some rules produce.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    /// How long comfort mode lasts once triggered.
    pub comfort_window: Duration,
    /// Let the model continue the creator-claim stub.
    pub creator_claim_ai: bool,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            comfort_window: Duration::minutes(5),
            creator_claim_ai: true,
        }
    }
}

/// What a rule sees besides the text.
pub struct RuleContext<'a> {
    pub session: &'a Session,
    pub now: DateTime<Utc>,
    pub settings: &'a ClassifierSettings,
}

/// A session change requested by a rule, applied by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    ActivateComfortMode { until: DateTime<Utc> },
}

/// Result of classifying one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub rule: RuleId,
    pub reply: Reply,
    pub effect: Option<SessionEffect>,
}

impl Classification {
    fn new(rule: RuleId, reply: Reply) -> Self {
        Self {
            rule,
            reply,
            effect: None,
        }
    }
}

pub type Predicate = fn(&NormalizedText, &RuleContext<'_>) -> bool;
pub type Synthesize = fn(&NormalizedText, &RuleContext<'_>) -> Classification;

/// One entry in the trigger table.
#[derive(Clone, Copy)]
pub struct TriggerRule {
    pub id: RuleId,
    pub predicate: Predicate,
    pub synthesize: Synthesize,
}

impl TriggerRule {
    pub fn matches(&self, text: &NormalizedText, ctx: &RuleContext<'_>) -> bool {
        (self.predicate)(text, ctx)
    }

    pub fn apply(&self, text: &NormalizedText, ctx: &RuleContext<'_>) -> Classification {
        (self.synthesize)(text, ctx)
    }
}

impl fmt::Debug for TriggerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerRule").field("id", &self.id).finish()
    }
}

/// The canonical trigger table, highest precedence first.
pub fn default_rules() -> Vec<TriggerRule> {
    vec![
        TriggerRule {
            id: RuleId::Help,
            predicate: is_help,
            synthesize: help,
        },
        TriggerRule {
            id: RuleId::Voice,
            predicate: is_voice,
            synthesize: voice,
        },
        TriggerRule {
            id: RuleId::CreatorClaim,
            predicate: is_creator_claim,
            synthesize: creator_claim,
        },
        TriggerRule {
            id: RuleId::CreatorMention,
            predicate: is_creator_mention,
            synthesize: creator_mention,
        },
        TriggerRule {
            id: RuleId::BotMention,
            predicate: is_bot_mention,
            synthesize: bot_mention,
        },
        TriggerRule {
            id: RuleId::AmbiguousName,
            predicate: is_ambiguous_name,
            synthesize: ambiguous_name,
        },
        TriggerRule {
            id: RuleId::Moderation,
            predicate: is_flagged,
            synthesize: refuse,
        },
        TriggerRule {
            id: RuleId::Comfort,
            predicate: is_comfort,
            synthesize: comfort,
        },
        TriggerRule {
            id: RuleId::ImageSearch,
            predicate: is_image_search,
            synthesize: image_search,
        },
        TriggerRule {
            id: RuleId::Roast,
            predicate: is_roast,
            synthesize: roast,
        },
        TriggerRule {
            id: RuleId::WhoMadeYou,
            predicate: is_who_made_you,
            synthesize: who_made_you,
        },
        TriggerRule {
            id: RuleId::Default,
            predicate: always,
            synthesize: delegate,
        },
    ]
}

// --- Help ---

fn is_help(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    phrases::HELP_KEYWORDS
        .iter()
        .any(|k| text.contains_joined(k, phrases::HELP_KEYWORD_MAX_WORDS))
        || phrases::HELP_EXACT.iter().any(|p| text.is_exactly(p))
}

fn help(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(RuleId::Help, Reply::help(texts::HELP_TEXT))
}

// --- Voice ---

static VOICE_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:please\s+)?say\s+(?:aloud|out\s+loud)\b\s*[:,\-]?\s*(.*?)\s*$")
        .expect("valid voice regex")
});

static VOICE_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:please\s+)?say\s+(.+?)\s+(?:aloud|out\s+loud)(?:\s+please)?[\s.!?]*$")
        .expect("valid voice regex")
});

/// The text to speak, if the message is a voice command. An empty payload
/// means the command had nothing to say.
pub fn voice_payload(raw: &str) -> Option<String> {
    let captures = VOICE_LEADING
        .captures(raw)
        .or_else(|| VOICE_TRAILING.captures(raw))?;
    let payload = captures.get(1).map_or("", |m| m.as_str());
    Some(
        payload
            .trim()
            .trim_matches(|c| matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}'))
            .trim()
            .to_string(),
    )
}

fn is_voice(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    voice_payload(text.raw()).is_some()
}

fn voice(text: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    let payload = voice_payload(text.raw()).unwrap_or_default();
    let reply = if payload.is_empty() {
        Reply::text(texts::VOICE_EMPTY_PROMPT)
    } else {
        Reply::voice(payload)
    };
    Classification::new(RuleId::Voice, reply)
}

// --- Creator claim / mention ---

fn is_creator_claim(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    phrases::CREATOR_CLAIMS
        .iter()
        .filter_map(|p| text.find_phrase(p))
        .any(|pos| {
            pos <= phrases::CREATOR_CLAIM_MAX_OFFSET
                || text.word_count() <= phrases::CREATOR_CLAIM_SHORT_MESSAGE
        })
}

fn creator_claim(text: &NormalizedText, ctx: &RuleContext<'_>) -> Classification {
    let reply = if ctx.settings.creator_claim_ai {
        Reply::delegated(PromptContext::continuing(
            text.raw(),
            texts::CREATOR_CLAIM_STUB,
        ))
    } else {
        Reply::text(format!(
            "{} {}",
            texts::CREATOR_CLAIM_STUB,
            texts::CREATOR_CLAIM_ENDING
        ))
    };
    Classification::new(RuleId::CreatorClaim, reply)
}

fn is_creator_mention(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    text.contains_any_phrase(phrases::CREATOR_ALIASES)
}

fn creator_mention(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(
        RuleId::CreatorMention,
        Reply::text(texts::CREATOR_MENTION_REPLY),
    )
}

// --- Bot name ---

fn is_bot_mention(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    text.stripped_contains_any(phrases::BOT_ALIASES_STRIPPED)
}

fn bot_mention(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(RuleId::BotMention, Reply::text(texts::BOT_MENTION_REPLY))
}

fn is_ambiguous_name(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    text.is_exactly(phrases::AMBIGUOUS_NAME)
}

fn ambiguous_name(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(
        RuleId::AmbiguousName,
        Reply::text(texts::AMBIGUOUS_NAME_REPLY),
    )
}

// --- Moderation ---

fn is_flagged(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    moderation::is_flagged(text)
}

fn refuse(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(RuleId::Moderation, Reply::refusal(texts::MESSAGE_REFUSAL))
}

// --- Comfort mode ---

fn is_comfort(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    text.contains_any_phrase(phrases::COMFORT)
}

fn comfort(text: &NormalizedText, ctx: &RuleContext<'_>) -> Classification {
    Classification {
        rule: RuleId::Comfort,
        reply: Reply::delegated(PromptContext::new(text.raw())),
        effect: Some(SessionEffect::ActivateComfortMode {
            until: ctx
                .now
                .checked_add_signed(ctx.settings.comfort_window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }),
    }
}

// --- Image search ---

static IMAGE_TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(.+?)\s+(?:pictures?|pics?|images?|wallpapers?|photos?)(?:\s+(?:please|pls))?[\s.!?]*$",
    )
    .expect("valid image regex")
});

static IMAGE_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:show|send|give|find)\s+me\s+)?(?:some\s+)?(?:pictures?|pics?|images?|wallpapers?|photos?)\s+of\s+(.+?)(?:\s+(?:please|pls))?[\s.!?]*$",
    )
    .expect("valid image regex")
});

static TOPIC_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:can|could)\s+you\s+)?(?:(?:please|pls)\s+)?(?:(?:show|send|give|find|get)\s+me(?:\s+|$))?(?:some\s+|a\s+few\s+|an?\s+)?",
    )
    .expect("valid filler regex")
});

/// The search topic, if the message asks for pictures.
pub fn image_topic(raw: &str) -> Option<String> {
    let captures = IMAGE_LEADING
        .captures(raw)
        .or_else(|| IMAGE_TRAILING.captures(raw))?;
    let topic = captures.get(1)?.as_str().trim();
    let topic = TOPIC_FILLER.replace(topic, "");
    let topic = topic.trim().trim_matches(|c| matches!(c, '"' | '\'')).trim();
    (!topic.is_empty()).then(|| topic.to_string())
}

fn is_image_search(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    image_topic(text.raw()).is_some()
}

fn image_search(text: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    let reply = match image_topic(text.raw()) {
        Some(topic) if !moderation::is_flagged_str(&topic) => {
            Reply::link(texts::IMAGE_SEARCH_TEMPLATE, topic)
        }
        _ => Reply::refusal(texts::TOPIC_REFUSAL),
    };
    Classification::new(RuleId::ImageSearch, reply)
}

// --- Roast ---

fn is_roast(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    text.contains_any_phrase(phrases::ROAST)
}

fn roast(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    let line = texts::ROASTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(texts::BOT_MENTION_REPLY);
    Classification::new(RuleId::Roast, Reply::text(line))
}

// --- Who made you ---

fn is_who_made_you(text: &NormalizedText, _: &RuleContext<'_>) -> bool {
    text.contains_any_phrase(phrases::WHO_MADE_YOU)
}

fn who_made_you(_: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(RuleId::WhoMadeYou, Reply::text(texts::WHO_MADE_YOU_REPLY))
}

// --- Default ---

fn always(_: &NormalizedText, _: &RuleContext<'_>) -> bool {
    true
}

fn delegate(text: &NormalizedText, _: &RuleContext<'_>) -> Classification {
    Classification::new(
        RuleId::Default,
        Reply::delegated(PromptContext::new(text.raw())),
    )
}
