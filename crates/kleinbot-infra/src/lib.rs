//! Infrastructure layer for KleinBot.
//!
//! Implements the collaborator ports defined in `kleinbot-core`: the
//! OpenAI-compatible chat-completion provider, the OpenAI-compatible
//! text-to-speech client and the Messenger Graph API client. Also loads the
//! TOML configuration file and reads secrets from the environment.

pub mod config;
pub mod llm;
pub mod messenger;
pub mod secret;
pub mod speech;
