use chrono::Utc;

use kleinbot_core::trigger::Classifier;
use kleinbot_types::config::KleinConfig;
use kleinbot_types::session::{Session, UserId};

/// Classify `message` against a fresh session and print the outcome.
pub fn run(config: &KleinConfig, message: &str, all: bool) -> anyhow::Result<()> {
    let classifier = Classifier::from_config(config);
    let now = Utc::now();
    let session = Session::new(UserId::from("cli"), now);

    let classification = classifier.classify(message, &session, now);
    println!("rule:  {}", classification.rule);
    println!("reply: {}", serde_json::to_string_pretty(&classification.reply)?);
    if classification.effect.is_some() {
        println!("effect: comfort mode");
    }

    if all {
        let matching = classifier
            .matching_rules(message, &session, now)
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>();
        println!("matching: {}", matching.join(", "));
    }
    Ok(())
}
