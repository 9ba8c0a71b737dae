//! Messenger Platform payloads.
//!
//! Inbound: the webhook delivery body (`object`, `entry[].messaging[]`).
//! Outbound: the Send API body (`recipient`, `message`).
//!
//! Inbound types are lenient: every field is optional or defaulted, and the
//! `entry` and `messaging` lists are decoded element by element, so a
//! malformed entry or event is dropped without failing its siblings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::session::UserId;

/// The `object` value carried by page subscriptions.
pub const PAGE_OBJECT: &str = "page";

/// Decode any value, falling back to `T::default()` when it has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a list one element at a time, keeping only the elements that parse.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Webhook delivery body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub object: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub entry: Vec<WebhookEntry>,
}

/// One page entry; may batch several messaging events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Participant>,
    #[serde(default)]
    pub recipient: Option<Participant>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Set on copies of messages the page itself sent.
    #[serde(default)]
    pub is_echo: bool,
}

/// A text message from a user, extracted from a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEvent {
    pub sender: UserId,
    pub text: String,
}

impl WebhookPayload {
    /// Whether this delivery belongs to a page subscription.
    pub fn is_page(&self) -> bool {
        self.object == PAGE_OBJECT
    }

    /// All user text events in delivery order.
    ///
    /// Skips events without a sender id or text, and page echoes.
    pub fn text_events(&self) -> Vec<TextEvent> {
        self.entry
            .iter()
            .flat_map(|entry| entry.messaging.iter())
            .filter_map(MessagingEvent::as_text_event)
            .collect()
    }
}

impl MessagingEvent {
    fn as_text_event(&self) -> Option<TextEvent> {
        let sender = self.sender.as_ref().filter(|s| !s.id.is_empty())?;
        let message = self.message.as_ref().filter(|m| !m.is_echo)?;
        let text = message.text.as_ref()?;
        Some(TextEvent {
            sender: UserId::new(sender.id.clone()),
            text: text.clone(),
        })
    }
}

/// Send API request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub recipient: Recipient,
    pub message: OutboundMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
}

/// Either a text body or an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Text { text: String },
    Attachment { attachment: Attachment },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: AttachmentPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentPayload {
    pub attachment_id: String,
}

impl SendRequest {
    pub fn text(recipient: &UserId, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient {
                id: recipient.to_string(),
            },
            message: OutboundMessage::Text { text: text.into() },
        }
    }

    pub fn audio(recipient: &UserId, attachment_id: impl Into<String>) -> Self {
        Self {
            recipient: Recipient {
                id: recipient.to_string(),
            },
            message: OutboundMessage::Attachment {
                attachment: Attachment {
                    kind: "audio".to_string(),
                    payload: AttachmentPayload {
                        attachment_id: attachment_id.into(),
                    },
                },
            },
        }
    }
}

/// Response of the attachment upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentUploadResponse {
    pub attachment_id: String,
}

/// Subset of the Graph API user profile KleinBot reads.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_delivery_and_extracts_text_events() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "object": "page",
            "entry": [
                {"id": "page-1", "messaging": [
                    {"sender": {"id": "u1"}, "recipient": {"id": "page-1"}, "message": {"mid": "m1", "text": "hi"}},
                    {"sender": {"id": "u2"}, "message": {"text": "yo"}}
                ]},
                {"messaging": [{"sender": {"id": "u3"}, "message": {"text": "third"}}]}
            ]
        }))
        .unwrap();

        assert!(payload.is_page());
        let events = payload.text_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].sender, UserId::from("u1"));
        assert_eq!(events[0].text, "hi");
        assert_eq!(events[2].text, "third");
    }

    #[test]
    fn skips_events_without_text_sender_or_with_echo() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "object": "page",
            "entry": [{"messaging": [
                {"sender": {"id": "u1"}, "message": {"mid": "m1"}},
                {"message": {"text": "no sender"}},
                {"sender": {"id": ""}, "message": {"text": "empty sender"}},
                {"sender": {"id": "page"}, "message": {"text": "echo", "is_echo": true}},
                {"sender": {"id": "u1"}, "postback": {"payload": "GET_STARTED"}},
                {"sender": {"id": "u1"}, "message": {"text": "kept"}}
            ]}]
        }))
        .unwrap();

        let events = payload.text_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text, "kept");
    }

    #[test]
    fn malformed_event_does_not_drop_its_siblings() {
        let payload: WebhookPayload = serde_json::from_value(json!({
            "object": "page",
            "entry": [
                {"messaging": [
                    {"sender": {"id": "u1"}, "message": {"text": "hello"}},
                    {"sender": {"id": "u2"}, "message": {"text": "hi", "is_echo": null}},
                    {"sender": {"id": "u3"}, "message": {"text": 42}},
                    {"sender": {"id": 7}, "message": {"text": "numeric sender"}},
                    {"sender": {"id": "u4"}, "message": {"text": "still here"}}
                ]},
                {"messaging": "not a list"},
                "not an entry",
                {"messaging": [{"sender": {"id": "u5"}, "message": {"text": "last"}}]}
            ]
        }))
        .unwrap();

        let events = payload.text_events();
        let texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "still here", "last"]);
    }

    #[test]
    fn mistyped_object_is_not_a_page() {
        let payload: WebhookPayload =
            serde_json::from_value(json!({"object": 1, "entry": []})).unwrap();
        assert!(!payload.is_page());
    }

    #[test]
    fn non_page_object_is_flagged() {
        let payload: WebhookPayload =
            serde_json::from_value(json!({"object": "instagram", "entry": []})).unwrap();
        assert!(!payload.is_page());
    }

    #[test]
    fn send_request_text_shape() {
        let req = SendRequest::text(&UserId::from("u1"), "Hello!");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"recipient": {"id": "u1"}, "message": {"text": "Hello!"}})
        );
    }

    #[test]
    fn send_request_audio_shape() {
        let req = SendRequest::audio(&UserId::from("u1"), "att-9");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "recipient": {"id": "u1"},
                "message": {"attachment": {"type": "audio", "payload": {"attachment_id": "att-9"}}}
            })
        );
    }
}
