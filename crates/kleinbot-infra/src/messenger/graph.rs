//! Messenger Platform client over the Graph API.
//!
//! The page access token travels as the `access_token` query parameter, as
//! the Graph API expects. It is stored as a [`SecretString`] and exposed
//! only while building a request.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};

use kleinbot_core::messenger::Messenger;
use kleinbot_types::config::MessengerConfig;
use kleinbot_types::error::DeliveryError;
use kleinbot_types::messenger::{AttachmentUploadResponse, SendRequest, UserProfile};
use kleinbot_types::session::UserId;
use kleinbot_types::speech::AudioClip;

/// Graph API client for the Send API, attachment upload and profile lookup.
///
/// Does NOT derive Debug so the page access token cannot be logged.
pub struct GraphMessengerClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    access_token: SecretString,
}

impl GraphMessengerClient {
    pub fn new(config: &MessengerConfig, access_token: SecretString) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.trim_matches('/').to_string(),
            access_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, path)
    }

    fn token_query(&self) -> [(&'static str, &str); 1] {
        [("access_token", self.access_token.expose_secret())]
    }

    /// Turn a non-2xx response into [`DeliveryError::Status`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DeliveryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(err: reqwest::Error) -> DeliveryError {
    // The URL carries the access token.
    DeliveryError::Transport(err.without_url().to_string())
}

impl Messenger for GraphMessengerClient {
    async fn send(&self, request: &SendRequest) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.endpoint("me/messages"))
            .query(&self.token_query())
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        Self::check(response).await?;
        tracing::debug!(recipient = %request.recipient.id, "message delivered");
        Ok(())
    }

    async fn upload_audio(&self, clip: &AudioClip) -> Result<String, DeliveryError> {
        let message = serde_json::json!({
            "attachment": {
                "type": "audio",
                "payload": {"is_reusable": true}
            }
        });
        let part = Part::bytes(clip.bytes.clone())
            .file_name(clip.file_name.clone())
            .mime_str(&clip.mime)
            .map_err(transport)?;
        let form = Form::new()
            .text("message", message.to_string())
            .part("filedata", part);

        let response = self
            .client
            .post(self.endpoint("me/message_attachments"))
            .query(&self.token_query())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let upload: AttachmentUploadResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.without_url().to_string()))?;

        tracing::debug!(attachment_id = %upload.attachment_id, bytes = clip.len(), "audio uploaded");
        Ok(upload.attachment_id)
    }

    async fn first_name(&self, user: &UserId) -> Result<Option<String>, DeliveryError> {
        let response = self
            .client
            .get(self.endpoint(user.as_str()))
            .query(&[("fields", "first_name")])
            .query(&self.token_query())
            .send()
            .await
            .map_err(transport)?;

        let profile: UserProfile = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.without_url().to_string()))?;

        Ok(profile.first_name)
    }
}
