//! OpenAI-compatible text-to-speech over `POST {base}/audio/speech`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use kleinbot_core::speech::SpeechSynthesizer;
use kleinbot_types::config::VoiceConfig;
use kleinbot_types::error::SpeechError;
use kleinbot_types::speech::AudioClip;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'static str,
}

/// Does NOT derive Debug so the API key cannot be logged.
pub struct OpenAiSpeech {
    client: reqwest::Client,
    base_url: String,
    model: String,
    voice: String,
    api_key: SecretString,
}

impl OpenAiSpeech {
    pub fn new(config: &VoiceConfig, api_key: SecretString) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            voice: config.voice.clone(),
            api_key,
        })
    }
}

impl SpeechSynthesizer for OpenAiSpeech {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
        let body = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %detail, "text-to-speech request rejected");
            return Err(SpeechError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(AudioClip::mp3(bytes.to_vec()))
    }
}

/// The speech collaborator selected by configuration.
pub enum SpeechBackend {
    OpenAi(OpenAiSpeech),
    /// Voice replies are turned off; every request fails with
    /// [`SpeechError::NotConfigured`] and the caller falls back to text.
    Disabled,
}

impl SpeechBackend {
    pub fn from_config(config: &VoiceConfig, api_key: SecretString) -> Result<Self, SpeechError> {
        if !config.enabled {
            return Ok(Self::Disabled);
        }
        Ok(Self::OpenAi(OpenAiSpeech::new(config, api_key)?))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::OpenAi(_))
    }
}

impl SpeechSynthesizer for SpeechBackend {
    async fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
        match self {
            Self::OpenAi(speech) => speech.synthesize(text).await,
            Self::Disabled => Err(SpeechError::NotConfigured),
        }
    }
}
