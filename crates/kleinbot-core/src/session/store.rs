//! Session store trait.
//!
//! Store operations never fail: the in-memory implementation has nothing to
//! fail on, and a key-value backend is expected to degrade to a fresh
//! session rather than surface errors into the reply path.

use std::time::Duration;

use chrono::{DateTime, Utc};

use kleinbot_types::config::SessionConfig;
use kleinbot_types::session::{Session, UserId};

/// Lifecycle policy shared by store implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Inactivity window; a session idle for longer is reset on next access.
    pub ttl: Duration,
    /// Maximum number of retained turns.
    pub capacity: usize,
    /// Turns rendered by [`SessionStore::build_context`].
    pub context_turns: usize,
}

impl SessionPolicy {
    /// Whether a session last active at `last_active_at` has expired at `now`.
    ///
    /// A session exactly `ttl` old is still alive.
    pub fn is_expired(&self, last_active_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let idle = now.signed_duration_since(last_active_at);
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => idle > ttl,
            // A TTL too large for chrono never expires.
            Err(_) => false,
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.ttl_secs),
            capacity: config.capacity.max(1),
            context_turns: config.context_turns,
        }
    }
}

/// Trait for per-user session storage.
///
/// Uses RPITIT (native async fn in traits) so a networked key-value backend
/// can implement it without changing callers.
pub trait SessionStore: Send + Sync {
    /// Return the live session for `user`, replacing it with a fresh one if it
    /// has expired. Always marks the session active at the current time.
    fn get_or_create(&self, user: &UserId) -> impl std::future::Future<Output = Session> + Send;

    /// Append an inbound user turn and bump the message counter.
    ///
    /// Returns the updated session.
    fn record_user_turn(
        &self,
        user: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Session> + Send;

    /// Append an outbound bot turn. Does not change the message counter.
    fn record_bot_turn(
        &self,
        user: &UserId,
        text: &str,
    ) -> impl std::future::Future<Output = ()> + Send;

    /// Render recent turns as `User: …` / `Bot: …` lines, oldest first.
    fn build_context(&self, user: &UserId) -> impl std::future::Future<Output = String> + Send;

    /// Turn on comfort mode until `until`.
    fn activate_comfort_mode(
        &self,
        user: &UserId,
        until: DateTime<Utc>,
    ) -> impl std::future::Future<Output = ()> + Send;

    /// Cache the result of a display-name lookup and mark the lookup as done,
    /// whether or not a name was found.
    fn set_display_name(
        &self,
        user: &UserId,
        name: Option<String>,
    ) -> impl std::future::Future<Output = ()> + Send;
}

/// Render the `limit` most recent turns of `session`, one per line.
pub fn render_context(session: &Session, limit: usize) -> String {
    session
        .recent_turns(limit)
        .map(|turn| format!("{}: {}", turn.speaker, turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kleinbot_types::session::{Speaker, Turn};

    #[test]
    fn policy_from_config() {
        let policy = SessionPolicy::from(&SessionConfig {
            ttl_secs: 60,
            capacity: 0,
            context_turns: 4,
            comfort_mode_secs: 10,
        });
        assert_eq!(policy.ttl, Duration::from_secs(60));
        // Capacity is never zero.
        assert_eq!(policy.capacity, 1);
        assert_eq!(policy.context_turns, 4);
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let policy = SessionPolicy {
            ttl: Duration::from_secs(3600),
            ..SessionPolicy::default()
        };
        let t = Utc::now();
        assert!(!policy.is_expired(t, t + chrono::Duration::seconds(3599)));
        assert!(!policy.is_expired(t, t + chrono::Duration::seconds(3600)));
        assert!(policy.is_expired(t, t + chrono::Duration::seconds(3601)));
    }

    #[test]
    fn render_context_alternates_labels() {
        let now = Utc::now();
        let mut session = Session::new(UserId::from("u1"), now);
        for (speaker, text) in [
            (Speaker::User, "hi"),
            (Speaker::Bot, "Hello!"),
            (Speaker::User, "how are you"),
        ] {
            session.turns.push_back(Turn {
                speaker,
                text: text.to_string(),
                at: now,
            });
        }

        assert_eq!(
            render_context(&session, 10),
            "User: hi\nBot: Hello!\nUser: how are you"
        );
        assert_eq!(render_context(&session, 1), "User: how are you");
        assert_eq!(render_context(&session, 0), "");
    }
}
