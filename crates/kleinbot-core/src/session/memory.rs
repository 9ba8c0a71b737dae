//! Process-local session store backed by `DashMap`.
//!
//! Updates to one user's session happen under that entry's shard lock, so
//! they are atomic within this process. Every access also sweeps out
//! sessions that have outlived the TTL, which bounds memory by the number of
//! recently active users. Nothing is shared across processes; a restart
//! drops every session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use kleinbot_types::session::{Session, Speaker, Turn, UserId};

use crate::clock::Clock;

use super::store::{SessionPolicy, SessionStore, render_context};

pub struct InMemorySessionStore {
    sessions: DashMap<UserId, Session>,
    policy: SessionPolicy,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    pub fn new(policy: SessionPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            policy,
            clock,
        }
    }

    /// Number of sessions currently held. Expired sessions are counted until
    /// the next access sweeps them out.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session idle for longer than the TTL.
    fn evict_expired(&self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !self.policy.is_expired(session.last_active_at, now));
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::debug!(evicted, "evicted expired sessions");
        }
    }

    /// Run `f` on the user's live session, creating or resetting it first.
    ///
    /// Every access counts as activity.
    fn with_live_session<R>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut Session, DateTime<Utc>) -> R,
    ) -> R {
        let now = self.clock.now();
        // No entry guard may be alive here: `retain` locks every shard.
        self.evict_expired(now);

        let mut entry = self
            .sessions
            .entry(user.clone())
            .or_insert_with(|| Session::new(user.clone(), now));

        if self.policy.is_expired(entry.last_active_at, now) {
            tracing::debug!(user_id = %user, "session expired, starting a new generation");
            *entry = Session::new(user.clone(), now);
        }
        entry.last_active_at = now;

        f(entry.value_mut(), now)
    }

    fn push_turn(&self, session: &mut Session, speaker: Speaker, text: &str, at: DateTime<Utc>) {
        session.turns.push_back(Turn {
            speaker,
            text: text.to_string(),
            at,
        });
        while session.turns.len() > self.policy.capacity {
            session.turns.pop_front();
        }
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, user: &UserId) -> Session {
        self.with_live_session(user, |session, _| session.clone())
    }

    async fn record_user_turn(&self, user: &UserId, text: &str) -> Session {
        self.with_live_session(user, |session, now| {
            self.push_turn(session, Speaker::User, text, now);
            session.message_count = session.message_count.saturating_add(1);
            session.clone()
        })
    }

    async fn record_bot_turn(&self, user: &UserId, text: &str) {
        self.with_live_session(user, |session, now| {
            self.push_turn(session, Speaker::Bot, text, now);
        });
    }

    async fn build_context(&self, user: &UserId) -> String {
        self.with_live_session(user, |session, _| {
            render_context(session, self.policy.context_turns)
        })
    }

    async fn activate_comfort_mode(&self, user: &UserId, until: DateTime<Utc>) {
        self.with_live_session(user, |session, _| {
            session.comfort_mode_until = Some(until);
        });
    }

    async fn set_display_name(&self, user: &UserId, name: Option<String>) {
        self.with_live_session(user, |session, _| {
            session.display_name = name;
            session.name_lookup_attempted = true;
        });
    }
}
