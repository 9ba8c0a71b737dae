//! Configuration types for KleinBot.
//!
//! `KleinConfig` represents the top-level `kleinbot.toml`. Every field has a
//! default, so an empty or missing file yields a working configuration.
//! Secrets are not part of this file; they come from the environment.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KleinConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub llm: LlmConfig,
    pub messenger: MessengerConfig,
    pub voice: VoiceConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Short-term memory policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity window after which a session is reset.
    pub ttl_secs: u64,
    /// Maximum remembered turns per user.
    pub capacity: usize,
    /// Most recent turns included in delegated prompts.
    pub context_turns: usize,
    /// How long comfort mode stays on once triggered.
    pub comfort_mode_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 30 * 60,
            capacity: 20,
            context_turns: 8,
            comfort_mode_secs: 5 * 60,
        }
    }
}

/// Chat-completion collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Replies longer than this are truncated.
    pub max_reply_chars: usize,
    /// Lines kept when truncating.
    pub truncate_lines: usize,
    /// Characters kept when truncating (before the ellipsis).
    pub truncate_chars: usize,
    /// Upper bound on one completion, retries included.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 200,
            temperature: 0.7,
            max_reply_chars: 800,
            truncate_lines: 5,
            truncate_chars: 700,
            timeout_secs: 30,
        }
    }
}

/// Messenger Platform (Graph API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    pub graph_base_url: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            graph_base_url: "https://graph.facebook.com".to_string(),
            api_version: "v17.0".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Text-to-speech collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub voice: String,
    pub timeout_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Optional behaviors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Prefix eligible replies with the user's first name.
    pub inject_names: bool,
    /// Let the model continue the skeptical creator-claim reply.
    pub creator_claim_ai: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            inject_names: false,
            creator_claim_ai: true,
        }
    }
}
