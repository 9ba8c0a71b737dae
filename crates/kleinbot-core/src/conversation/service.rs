//! ConversationService: one inbound text event in, one reply out.
//!
//! Each event moves through normalize, classify, synthesize, post-process,
//! dispatch and record. The user turn is recorded before classification so
//! the footer counter includes the current message; the bot turn is recorded
//! only after a successful send and holds exactly the delivered text.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{Instrument, debug, error, info, info_span, warn};

use kleinbot_types::config::KleinConfig;
use kleinbot_types::messenger::{SendRequest, TextEvent, WebhookPayload};
use kleinbot_types::reply::Synthesized;
use kleinbot_types::session::Session;

use crate::clock::Clock;
use crate::llm::LlmProvider;
use crate::messenger::Messenger;
use crate::reply::post_process::PostProcessor;
use crate::reply::synthesizer::Synthesizer;
use crate::reply::texts::VOICE_TURN_PREFIX;
use crate::session::SessionStore;
use crate::speech::SpeechSynthesizer;
use crate::trigger::{Classifier, RuleId, SessionEffect};

/// What happened to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub rule: RuleId,
    /// The text sent to the user (the transcript, for voice replies).
    pub reply_text: String,
    pub voice: bool,
    pub delivered: bool,
}

pub struct ConversationService<S, L, M, T> {
    store: Arc<S>,
    messenger: Arc<M>,
    classifier: Classifier,
    synthesizer: Synthesizer<L, M, T>,
    post_processor: PostProcessor,
    clock: Arc<dyn Clock>,
}

impl<S, L, M, T> ConversationService<S, L, M, T>
where
    S: SessionStore,
    L: LlmProvider,
    M: Messenger,
    T: SpeechSynthesizer,
{
    pub fn new(
        store: Arc<S>,
        llm: Arc<L>,
        messenger: Arc<M>,
        speech: Arc<T>,
        clock: Arc<dyn Clock>,
        config: &KleinConfig,
    ) -> Self {
        Self {
            store,
            messenger: messenger.clone(),
            classifier: Classifier::from_config(config),
            synthesizer: Synthesizer::new(llm, messenger, speech, config.llm.clone()),
            post_processor: PostProcessor::from_flags(&config.features),
            clock,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Handle every text event of a webhook delivery, one after another.
    ///
    /// A panic while handling one event is logged and does not stop the
    /// remaining events. Returns the number of events handled.
    pub async fn handle_payload(&self, payload: &WebhookPayload) -> usize {
        if !payload.is_page() {
            debug!(object = %payload.object, "ignoring non-page delivery");
            return 0;
        }

        let mut handled = 0;
        for event in payload.text_events() {
            match AssertUnwindSafe(self.handle_event(&event)).catch_unwind().await {
                Ok(Some(_)) => handled += 1,
                Ok(None) => {}
                Err(_) => error!(user_id = %event.sender, "panic while handling event"),
            }
        }
        handled
    }

    /// Run the full pipeline for one event. Returns `None` for blank text.
    pub async fn handle_event(&self, event: &TextEvent) -> Option<TurnOutcome> {
        let text = event.text.trim();
        if text.is_empty() {
            return None;
        }

        let span = info_span!("conversation.turn", user_id = %event.sender);
        Some(self.run_turn(event, text).instrument(span).await)
    }

    async fn run_turn(&self, event: &TextEvent, text: &str) -> TurnOutcome {
        let user = &event.sender;

        // Context is rendered before this message is recorded, so the prompt
        // only carries earlier turns.
        let history = self.store.build_context(user).await;
        let mut session = self.store.record_user_turn(user, text).await;
        self.ensure_display_name(&mut session).await;

        let now = self.clock.now();
        let classification = self.classifier.classify(text, &session, now);
        info!(
            rule = %classification.rule,
            reply = classification.reply.kind(),
            message_count = session.message_count,
            "message classified"
        );

        if let Some(SessionEffect::ActivateComfortMode { until }) = classification.effect {
            self.store.activate_comfort_mode(user, until).await;
            session.comfort_mode_until = Some(until);
        }

        let comfort_active = session.comfort_mode_active(now);
        let synthesized = self
            .synthesizer
            .synthesize(&classification.reply, &history, comfort_active)
            .await;

        let (request, reply_text, recorded, voice) = match synthesized {
            Synthesized::Text {
                text,
                suppress_footer,
                personalize,
            } => {
                let text = self
                    .post_processor
                    .apply(&text, suppress_footer, personalize, &session);
                (SendRequest::text(user, text.clone()), text.clone(), text, false)
            }
            Synthesized::Audio {
                attachment_id,
                transcript,
            } => (
                SendRequest::audio(user, attachment_id),
                transcript.clone(),
                format!("{VOICE_TURN_PREFIX}{transcript}"),
                true,
            ),
        };

        let delivered = match self.messenger.send(&request).await {
            Ok(()) => {
                self.store.record_bot_turn(user, &recorded).await;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to deliver reply");
                false
            }
        };

        TurnOutcome {
            rule: classification.rule,
            reply_text,
            voice,
            delivered,
        }
    }

    /// Look up the user's first name once per session generation.
    async fn ensure_display_name(&self, session: &mut Session) {
        if !self.post_processor.inject_names() || session.name_lookup_attempted {
            return;
        }

        let name = match self.messenger.first_name(&session.user_id).await {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                debug!(error = %e, "profile lookup failed");
                None
            }
        };

        self.store
            .set_display_name(&session.user_id, name.clone())
            .await;
        session.display_name = name;
        session.name_lookup_attempted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::reply::texts;
    use crate::session::{InMemorySessionStore, SessionPolicy};
    use crate::testing::{MockLlm, MockMessenger, MockSpeech};
    use kleinbot_types::messenger::OutboundMessage;
    use kleinbot_types::session::{Speaker, UserId};

    type TestService = ConversationService<InMemorySessionStore, MockLlm, MockMessenger, MockSpeech>;

    struct Harness {
        service: TestService,
        store: Arc<InMemorySessionStore>,
        llm: Arc<MockLlm>,
        messenger: Arc<MockMessenger>,
        clock: ManualClock,
    }

    fn harness_with(llm: MockLlm, messenger: MockMessenger, config: KleinConfig) -> Harness {
        let clock = ManualClock::default();
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        let store = Arc::new(InMemorySessionStore::new(
            SessionPolicy::from(&config.session),
            shared.clone(),
        ));
        let llm = Arc::new(llm);
        let messenger = Arc::new(messenger);
        let service = ConversationService::new(
            store.clone(),
            llm.clone(),
            messenger.clone(),
            Arc::new(MockSpeech::default()),
            shared,
            &config,
        );
        Harness {
            service,
            store,
            llm,
            messenger,
            clock,
        }
    }

    fn harness(llm_reply: &str) -> Harness {
        harness_with(
            MockLlm::replying(llm_reply),
            MockMessenger::new(),
            KleinConfig::default(),
        )
    }

    fn event(text: &str) -> TextEvent {
        TextEvent {
            sender: UserId::from("user-1"),
            text: text.to_string(),
        }
    }

    fn sent_texts(messenger: &MockMessenger) -> Vec<String> {
        messenger
            .sent()
            .into_iter()
            .filter_map(|r| match r.message {
                OutboundMessage::Text { text } => Some(text),
                OutboundMessage::Attachment { .. } => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn first_message_gets_footer() {
        let h = harness("Hello there!");
        let outcome = h.service.handle_event(&event("hi")).await.unwrap();
        assert_eq!(outcome.rule, RuleId::Default);
        assert!(outcome.delivered);
        assert_eq!(outcome.reply_text, format!("Hello there!{}", texts::FOOTER));

        let second = h.service.handle_event(&event("how are you")).await.unwrap();
        assert_eq!(second.reply_text, "Hello there!");
    }

    #[tokio::test]
    async fn help_has_no_footer_even_on_first_message() {
        let h = harness("unused");
        let outcome = h.service.handle_event(&event("gpthelp")).await.unwrap();
        assert_eq!(outcome.rule, RuleId::Help);
        assert_eq!(outcome.reply_text, texts::HELP_TEXT);
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn roast_comes_from_pool() {
        let h = harness("unused");
        h.service.handle_event(&event("hello")).await;
        let outcome = h.service.handle_event(&event("roast me")).await.unwrap();
        assert_eq!(outcome.rule, RuleId::Roast);
        assert!(texts::ROASTS.contains(&outcome.reply_text.as_str()));
    }

    #[tokio::test]
    async fn unsafe_image_request_is_refused_without_ai() {
        let h = harness("unused");
        let outcome = h.service.handle_event(&event("nude pictures")).await.unwrap();
        assert_eq!(outcome.rule, RuleId::Moderation);
        assert!(outcome.reply_text.starts_with(texts::MESSAGE_REFUSAL));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn inactivity_resets_session() {
        let h = harness("ok");
        let user = UserId::from("user-1");

        h.service.handle_event(&event("one")).await;
        h.service.handle_event(&event("two")).await;
        assert_eq!(h.store.get_or_create(&user).await.message_count, 2);

        h.clock.advance(chrono::Duration::minutes(29));
        h.service.handle_event(&event("three")).await;
        assert_eq!(h.store.get_or_create(&user).await.message_count, 3);

        h.clock.advance(chrono::Duration::minutes(31));
        let outcome = h.service.handle_event(&event("four")).await.unwrap();
        // A fresh session starts counting at one again, so the footer returns.
        assert!(outcome.reply_text.ends_with(texts::FOOTER));
        let session = h.store.get_or_create(&user).await;
        assert_eq!(session.message_count, 1);
        assert_eq!(session.turns.len(), 2);
    }

    #[tokio::test]
    async fn prompt_carries_prior_turns_only() {
        let h = harness("sure");
        h.service.handle_event(&event("my name is Ana")).await;
        h.service.handle_event(&event("what is my name")).await;

        let requests = h.llm.requests();
        assert_eq!(requests.len(), 2);
        // The first prompt has no memory block.
        assert_eq!(requests[0].messages.len(), 2);
        let memory = &requests[1].messages[1].content;
        assert!(memory.contains("User: my name is Ana"));
        assert!(memory.contains("Bot: sure"));
        assert!(!memory.contains("what is my name"));
    }

    #[tokio::test]
    async fn bot_turn_records_exactly_what_was_sent() {
        let h = harness("  X  ");
        let outcome = h.service.handle_event(&event("ping")).await.unwrap();
        let session = h.store.get_or_create(&UserId::from("user-1")).await;
        let last = session.turns.back().unwrap();
        assert_eq!(last.speaker, Speaker::Bot);
        assert_eq!(last.text, outcome.reply_text);
        assert_eq!(sent_texts(&h.messenger), vec![outcome.reply_text]);
    }

    #[tokio::test]
    async fn failed_delivery_keeps_user_turn_only() {
        let h = harness_with(
            MockLlm::replying("hi"),
            MockMessenger::new().failing_send(),
            KleinConfig::default(),
        );
        let outcome = h.service.handle_event(&event("hello")).await.unwrap();
        assert!(!outcome.delivered);
        let session = h.store.get_or_create(&UserId::from("user-1")).await;
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].speaker, Speaker::User);
    }

    #[tokio::test]
    async fn comfort_mode_shapes_following_prompts() {
        let h = harness("🤍");
        h.service.handle_event(&event("palambing please")).await;
        h.service.handle_event(&event("thank you")).await;
        h.clock.advance(chrono::Duration::minutes(6));
        h.service.handle_event(&event("and now?")).await;

        let requests = h.llm.requests();
        assert!(requests[0].messages[0].content.contains(texts::COMFORT_PROMPT));
        assert!(requests[1].messages[0].content.contains(texts::COMFORT_PROMPT));
        assert!(!requests[2].messages[0].content.contains(texts::COMFORT_PROMPT));
    }

    #[tokio::test]
    async fn voice_reply_is_sent_as_audio() {
        let h = harness("unused");
        let outcome = h.service.handle_event(&event("say good night aloud")).await.unwrap();
        assert!(outcome.voice);
        assert_eq!(outcome.reply_text, "good night");
        let sent = h.messenger.sent();
        assert!(matches!(sent[0].message, OutboundMessage::Attachment { .. }));
        let session = h.store.get_or_create(&UserId::from("user-1")).await;
        assert_eq!(
            session.turns.back().unwrap().text,
            format!("{VOICE_TURN_PREFIX}good night")
        );
    }

    #[tokio::test]
    async fn names_are_looked_up_once_and_injected() {
        let mut config = KleinConfig::default();
        config.features.inject_names = true;
        let h = harness_with(
            MockLlm::replying("hello!"),
            MockMessenger::new().with_first_name("Ana"),
            config,
        );
        let first = h.service.handle_event(&event("hi")).await.unwrap();
        let second = h.service.handle_event(&event("hi again")).await.unwrap();
        assert!(first.reply_text.starts_with("Ana, hello!"));
        assert_eq!(second.reply_text, "Ana, hello!");
        assert_eq!(h.messenger.profile_lookups(), 1);

        // Help is never personalized.
        let help = h.service.handle_event(&event("gpthelp")).await.unwrap();
        assert_eq!(help.reply_text, texts::HELP_TEXT);
    }

    #[tokio::test]
    async fn failed_name_lookup_is_silent_and_not_retried() {
        let mut config = KleinConfig::default();
        config.features.inject_names = true;
        let h = harness_with(
            MockLlm::replying("hey"),
            MockMessenger::new().failing_profile(),
            config,
        );
        h.service.handle_event(&event("hi")).await;
        let second = h.service.handle_event(&event("hi")).await.unwrap();
        assert_eq!(second.reply_text, "hey");
        assert_eq!(h.messenger.profile_lookups(), 1);
    }

    #[tokio::test]
    async fn blank_text_is_ignored() {
        let h = harness("unused");
        assert!(h.service.handle_event(&event("   ")).await.is_none());
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn payload_events_are_handled_in_order() {
        let h = harness("ok");
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "object": "page",
            "entry": [
                {"messaging": [
                    {"sender": {"id": "a"}, "message": {"text": "gpthelp"}},
                    {"sender": {"id": "b"}, "message": {"text": "roast me"}}
                ]},
                {"messaging": [
                    {"sender": {"id": "a"}, "message": {"text": "hi", "is_echo": true}},
                    {"sender": {"id": "c"}, "message": {"attachments": []}}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(h.service.handle_payload(&payload).await, 2);
        let recipients: Vec<String> = h.messenger.sent().into_iter().map(|r| r.recipient.id).collect();
        assert_eq!(recipients, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn non_page_payload_is_ignored() {
        let h = harness("ok");
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "object": "instagram",
            "entry": [{"messaging": [{"sender": {"id": "a"}, "message": {"text": "hi"}}]}]
        }))
        .unwrap();
        assert_eq!(h.service.handle_payload(&payload).await, 0);
        assert!(h.messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn context_is_bounded_by_policy() {
        let mut config = KleinConfig::default();
        config.session.context_turns = 2;
        let h = harness_with(MockLlm::replying("r"), MockMessenger::new(), config);
        for msg in ["a", "b", "c"] {
            h.service.handle_event(&event(msg)).await;
        }
        let last = h.llm.requests().pop().unwrap();
        assert_eq!(last.messages[1].content.lines().count(), 3);
    }
}
