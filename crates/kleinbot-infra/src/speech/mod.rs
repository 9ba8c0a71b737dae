//! Text-to-speech clients.

pub mod openai_tts;

pub use openai_tts::{OpenAiSpeech, SpeechBackend};
