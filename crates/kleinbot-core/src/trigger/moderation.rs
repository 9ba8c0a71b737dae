//! Denylist moderation.
//!
//! Runs locally and synchronously so refusals never depend on a reachable
//! AI collaborator.

use super::normalize::NormalizedText;
use super::phrases::{DENYLIST, DENYLIST_STRIPPED};

/// Whether `text` contains a denylisted term.
pub fn is_flagged(text: &NormalizedText) -> bool {
    text.words().iter().any(|w| DENYLIST.contains(&w.as_str()))
        || text.stripped_contains_any(DENYLIST_STRIPPED)
}

/// Moderation check for a free-standing fragment such as an image topic.
pub fn is_flagged_str(fragment: &str) -> bool {
    is_flagged(&NormalizedText::new(fragment))
}
