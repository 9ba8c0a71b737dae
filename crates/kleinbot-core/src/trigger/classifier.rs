use chrono::{DateTime, Utc};

use kleinbot_types::config::KleinConfig;
use kleinbot_types::session::Session;

use super::normalize::NormalizedText;
use super::rules::{Classification, ClassifierSettings, RuleContext, RuleId, TriggerRule, default_rules};

/// Walks the trigger table and returns the first matching rule's reply.
///
/// Classification is pure: the only session change a rule may request comes
/// back as [`Classification::effect`] for the caller to apply.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<TriggerRule>,
    settings: ClassifierSettings,
}

impl Classifier {
    pub fn new(settings: ClassifierSettings) -> Self {
        Self::with_rules(default_rules(), settings)
    }

    /// Build from an explicit table. The last rule should always match;
    /// if none does, the message is delegated as plain conversation.
    pub fn with_rules(rules: Vec<TriggerRule>, settings: ClassifierSettings) -> Self {
        Self { rules, settings }
    }

    pub fn from_config(config: &KleinConfig) -> Self {
        let secs = config.session.comfort_mode_secs;
        let comfort_window = i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| {
                tracing::warn!(secs, "comfort_mode_secs out of range, using the default window");
                ClassifierSettings::default().comfort_window
            });

        Self::new(ClassifierSettings {
            comfort_window,
            creator_claim_ai: config.features.creator_claim_ai,
        })
    }

    pub fn settings(&self) -> &ClassifierSettings {
        &self.settings
    }

    pub fn classify(&self, text: &str, session: &Session, now: DateTime<Utc>) -> Classification {
        let normalized = NormalizedText::new(text);
        let ctx = RuleContext {
            session,
            now,
            settings: &self.settings,
        };

        for rule in &self.rules {
            if rule.matches(&normalized, &ctx) {
                tracing::debug!(rule = %rule.id, "trigger matched");
                return rule.apply(&normalized, &ctx);
            }
        }

        Classification {
            rule: RuleId::Default,
            reply: kleinbot_types::reply::Reply::delegated(
                kleinbot_types::reply::PromptContext::new(normalized.raw()),
            ),
            effect: None,
        }
    }

    /// Every rule whose predicate matches, in table order. Only the first
    /// one decides the reply; the rest are useful for diagnostics.
    pub fn matching_rules(&self, text: &str, session: &Session, now: DateTime<Utc>) -> Vec<RuleId> {
        let normalized = NormalizedText::new(text);
        let ctx = RuleContext {
            session,
            now,
            settings: &self.settings,
        };
        self.rules
            .iter()
            .filter(|rule| rule.matches(&normalized, &ctx))
            .map(|rule| rule.id)
            .collect()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierSettings::default())
    }
}
