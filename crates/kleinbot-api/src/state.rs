//! Application state wiring all services together.
//!
//! The conversation service is generic over its collaborators; AppState pins
//! it to the concrete infra implementations.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use kleinbot_core::clock::{Clock, SystemClock};
use kleinbot_core::conversation::ConversationService;
use kleinbot_core::session::{InMemorySessionStore, SessionPolicy};
use kleinbot_infra::llm::{OpenAiCompatConfig, OpenAiCompatibleProvider};
use kleinbot_infra::messenger::GraphMessengerClient;
use kleinbot_infra::secret::Secrets;
use kleinbot_infra::speech::SpeechBackend;
use kleinbot_types::config::KleinConfig;

/// Concrete type alias for the conversation pipeline pinned to infra.
pub type ConcreteConversationService = ConversationService<
    InMemorySessionStore,
    OpenAiCompatibleProvider,
    GraphMessengerClient,
    SpeechBackend,
>;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<ConcreteConversationService>,
    pub verify_token: Arc<SecretString>,
}

impl AppState {
    /// Wire collaborators and the conversation pipeline.
    pub fn init(config: &KleinConfig, secrets: Secrets) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let store = Arc::new(InMemorySessionStore::new(
            SessionPolicy::from(&config.session),
            clock.clone(),
        ));

        let voice_key = SecretString::from(secrets.voice_key().expose_secret().to_owned());
        let speech = SpeechBackend::from_config(&config.voice, voice_key)?;
        if !speech.is_enabled() {
            tracing::info!("voice replies disabled");
        }

        let llm = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from_llm_config(
            &config.llm,
            secrets.openai_api_key,
        ))?;
        let messenger = GraphMessengerClient::new(&config.messenger, secrets.page_access_token)?;

        let conversation = ConversationService::new(
            store,
            Arc::new(llm),
            Arc::new(messenger),
            Arc::new(speech),
            clock,
            config,
        );

        Ok(Self {
            conversation: Arc::new(conversation),
            verify_token: Arc::new(secrets.verify_token),
        })
    }
}
