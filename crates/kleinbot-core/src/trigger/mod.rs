//! Trigger classification.
//!
//! Maps an inbound message to exactly one [`Reply`](kleinbot_types::reply::Reply)
//! by walking an ordered rule table. Moderation and the cheap fixed-text
//! rules run before anything that could reach an AI collaborator.

pub mod classifier;
pub mod moderation;
pub mod normalize;
pub mod phrases;
pub mod rules;

pub use classifier::Classifier;
pub use normalize::NormalizedText;
pub use rules::{
    Classification, ClassifierSettings, RuleContext, RuleId, SessionEffect, TriggerRule,
    default_rules,
};
