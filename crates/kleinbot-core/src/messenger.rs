//! Messaging platform port.

use kleinbot_types::error::DeliveryError;
use kleinbot_types::messenger::SendRequest;
use kleinbot_types::session::UserId;
use kleinbot_types::speech::AudioClip;

/// Outbound side of the messaging platform.
///
/// Implementations live in kleinbot-infra (`GraphMessengerClient`).
pub trait Messenger: Send + Sync {
    /// Deliver one message to a recipient.
    fn send(
        &self,
        request: &SendRequest,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;

    /// Upload an audio clip as a reusable attachment and return its id.
    fn upload_audio(
        &self,
        clip: &AudioClip,
    ) -> impl std::future::Future<Output = Result<String, DeliveryError>> + Send;

    /// Best-effort first name lookup for a user.
    fn first_name(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<String>, DeliveryError>> + Send;
}
