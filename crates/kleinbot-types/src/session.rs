//! Conversational session types.
//!
//! A [`Session`] is the short-term, process-local memory KleinBot keeps per
//! Messenger user: the most recent turns, the inbound message counter used
//! for the footer cadence, and a couple of transient mode flags.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page-scoped user identifier supplied by the messaging platform.
///
/// Opaque to KleinBot: never generated or parsed, only used as a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "User"),
            Speaker::Bot => write!(f, "Bot"),
        }
    }
}

/// A single remembered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Per-user conversational state.
///
/// Owned by the session store; everything else works on clones returned
/// from store operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    /// Oldest first. Bounded by the store's capacity.
    pub turns: VecDeque<Turn>,
    pub last_active_at: DateTime<Utc>,
    /// Inbound user messages in this session generation.
    pub message_count: u32,
    /// Comfort ("palambing") mode stays on while this lies in the future.
    pub comfort_mode_until: Option<DateTime<Utc>>,
    pub display_name: Option<String>,
    pub name_lookup_attempted: bool,
}

impl Session {
    /// A fresh, empty session generation.
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            turns: VecDeque::new(),
            last_active_at: now,
            message_count: 0,
            comfort_mode_until: None,
            display_name: None,
            name_lookup_attempted: false,
        }
    }

    /// Whether comfort mode is active at `now`.
    pub fn comfort_mode_active(&self, now: DateTime<Utc>) -> bool {
        self.comfort_mode_until.is_some_and(|until| now < until)
    }

    /// The `n` most recent turns, oldest first.
    pub fn recent_turns(&self, n: usize) -> impl Iterator<Item = &Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip)
    }
}
