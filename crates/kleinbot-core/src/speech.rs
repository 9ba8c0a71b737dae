//! Text-to-speech port.

use kleinbot_types::error::SpeechError;
use kleinbot_types::speech::AudioClip;

pub trait SpeechSynthesizer: Send + Sync {
    /// Render `text` as an audio clip.
    fn synthesize(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<AudioClip, SpeechError>> + Send;
}
