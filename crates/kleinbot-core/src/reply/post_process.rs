//! Footer and display-name decoration for text replies.
//!
//! Both steps are idempotent, so running the post-processor twice over the
//! same reply never duplicates the footer or the name prefix.

use kleinbot_types::config::FeatureFlags;
use kleinbot_types::session::Session;

use super::texts::FOOTER;

/// The footer goes on the first message of a session and every tenth one.
pub fn should_append_footer(message_count: u32) -> bool {
    message_count == 1 || (message_count > 0 && message_count % 10 == 0)
}

fn footer_marker() -> &'static str {
    FOOTER.trim()
}

pub fn append_footer(text: &str) -> String {
    if text.contains(footer_marker()) {
        text.to_string()
    } else {
        format!("{text}{FOOTER}")
    }
}

pub fn prefix_name(text: &str, name: &str) -> String {
    let prefix = format!("{name}, ");
    if text.starts_with(&prefix) {
        text.to_string()
    } else {
        format!("{prefix}{text}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostProcessor {
    inject_names: bool,
}

impl PostProcessor {
    pub fn new(inject_names: bool) -> Self {
        Self { inject_names }
    }

    pub fn from_flags(flags: &FeatureFlags) -> Self {
        Self::new(flags.inject_names)
    }

    pub fn inject_names(&self) -> bool {
        self.inject_names
    }

    /// Decorate a text reply for `session`.
    pub fn apply(
        &self,
        text: &str,
        suppress_footer: bool,
        personalize: bool,
        session: &Session,
    ) -> String {
        let mut out = text.to_string();

        if self.inject_names && personalize {
            if let Some(name) = session.display_name.as_deref().filter(|n| !n.is_empty()) {
                out = prefix_name(&out, name);
            }
        }

        if !suppress_footer && should_append_footer(session.message_count) {
            out = append_footer(&out);
        }

        out
    }
}
