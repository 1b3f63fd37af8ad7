use serde::{Deserialize, Serialize};

/// Event name Comapi uses for a chat message delivery.
pub const CHAT_MESSAGE_SENT: &str = "chatMessage.sent";

/// Webhook event pushed by the Comapi Chat API.
///
/// Only `chatMessage.sent` events travelling inbound are translated; everything
/// else is acknowledged and dropped. Unknown event names and directions must
/// not fail deserialization, so the fields default instead of being required.
///
/// ```
/// use cmb_core::{ChatEvent, Direction};
///
/// let event: ChatEvent = serde_json::from_str(r#"{
///   "name": "chatMessage.sent",
///   "eventId": "evt-1",
///   "payload": {
///     "context": {
///       "direction": "inbound",
///       "from": { "id": "alice" },
///       "chatId": "room-7"
///     },
///     "parts": [{ "type": "text/plain", "data": "hi" }]
///   }
/// }"#).unwrap();
/// assert!(event.is_message_sent());
/// assert_eq!(event.payload.context.direction, Direction::Inbound);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatEvent {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "eventId")]
    pub event_id: String,
    #[serde(default)]
    pub payload: ChatPayload,
}

impl ChatEvent {
    pub fn is_message_sent(&self) -> bool {
        self.name == CHAT_MESSAGE_SENT
    }
}

/// Unknown event families carry payloads of entirely different shapes; every
/// field defaults so those events still parse and can be acknowledged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatPayload {
    #[serde(default)]
    pub context: ChatContext,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
    #[serde(default, rename = "messageParts")]
    pub message_parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatContext {
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub from: ChatProfile,
    #[serde(default, rename = "chatId")]
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatProfile {
    #[serde(default)]
    pub id: String,
}

/// Direction of a chat event relative to the chat platform.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One part of a chat message. Text parts carry `data`, media parts carry
/// `url`; a single message may mix both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl MessagePart {
    /// Plain text part for an outbound chat message, sized like the reference
    /// API expects (`size` = byte length of the data).
    pub fn text(data: impl Into<String>) -> Self {
        let data = data.into();
        Self {
            name: Some("Text".into()),
            kind: "text/plain".into(),
            size: Some(data.len() as u64),
            data: Some(data),
            url: None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind.starts_with("text/")
    }
}

/// Media classification understood by the bot platform's `/media` endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    File,
}

impl MediaKind {
    /// Classifies a MIME type by prefix; anything unrecognized is a file.
    ///
    /// ```
    /// use cmb_core::MediaKind;
    /// assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
    /// assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::File);
    /// ```
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("audio/") {
            MediaKind::Audio
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::File
        }
    }
}

/// Webhook event pushed by the Meya bot platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotEvent {
    #[serde(default)]
    pub sender: Sender,
    #[serde(default, rename = "type")]
    pub kind: BotEventKind,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TypingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotEventKind {
    Typing,
    Text,
    Card,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Typing indicator state; anything other than `"on"` turns the indicator
/// off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypingStatus {
    On,
    Off,
    #[serde(other)]
    Unknown,
}

/// Rich message attachment sent by the bot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: CardKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub buttons: Vec<CardButton>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Image,
    TextButtons,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardButton {
    pub action: String,
}

/// Request body for the bot platform's receive endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BotRequest {
    pub user_id: String,
    pub integration: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaKind>,
}

impl BotRequest {
    pub fn text(user_id: String, text: String) -> Self {
        Self {
            user_id,
            integration: "Webhook",
            text: Some(text),
            url: None,
            media: None,
        }
    }

    pub fn media(user_id: String, url: String, media: MediaKind) -> Self {
        Self {
            user_id,
            integration: "Webhook",
            text: None,
            url: Some(url),
            media: Some(media),
        }
    }
}

/// Chat-message-create body posted to the Comapi messages endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    pub from: ChatMessageFrom,
    pub parts: Vec<MessagePart>,
    pub alert: ChatAlert,
    pub direction: &'static str,
    pub is_automated_send: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageFrom {
    pub profile_id: String,
    pub name: String,
}

/// Push-notification text shown alongside the chat message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatAlert {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_event_unknown_direction_still_parses() {
        let event: ChatEvent = serde_json::from_value(json!({
            "name": "profile.update",
            "payload": {
                "context": {
                    "direction": "internal",
                    "from": { "id": "alice" },
                    "chatId": "room-7"
                }
            }
        }))
        .unwrap();
        assert!(!event.is_message_sent());
        assert_eq!(event.payload.context.direction, Direction::Unknown);
        assert!(event.payload.parts.is_empty());
    }

    #[test]
    fn bot_event_card_wire_format() {
        let event: BotEvent = serde_json::from_value(json!({
            "sender": "bot",
            "type": "card",
            "user_id": "alice|room-7",
            "card": {
                "type": "text_buttons",
                "text": "Pick one",
                "buttons": [{ "action": "Yes" }, { "action": "No" }]
            }
        }))
        .unwrap();
        assert_eq!(event.sender, Sender::Bot);
        assert_eq!(event.kind, BotEventKind::Card);
        let card = event.card.unwrap();
        assert_eq!(card.kind, CardKind::TextButtons);
        assert_eq!(card.buttons.len(), 2);
    }

    #[test]
    fn bot_event_unknown_kinds_fall_through() {
        let event: BotEvent = serde_json::from_value(json!({
            "sender": "system",
            "type": "read_receipt",
            "user_id": "alice|room-7"
        }))
        .unwrap();
        assert_eq!(event.sender, Sender::Unknown);
        assert_eq!(event.kind, BotEventKind::Unknown);
    }

    #[test]
    fn unrecognized_typing_status_still_parses() {
        let event: BotEvent = serde_json::from_value(json!({
            "sender": "bot",
            "type": "typing",
            "user_id": "alice|room-7",
            "status": "paused"
        }))
        .unwrap();
        assert_eq!(event.status, Some(TypingStatus::Unknown));
    }

    #[test]
    fn bot_request_serializes_media_type() {
        let request = BotRequest::media(
            "alice|room-7".into(),
            "https://cdn.example.com/pic.png".into(),
            MediaKind::Image,
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "user_id": "alice|room-7",
                "integration": "Webhook",
                "url": "https://cdn.example.com/pic.png",
                "type": "image"
            })
        );
    }

    #[test]
    fn chat_message_request_uses_camel_case_wire_names() {
        let request = ChatMessageRequest {
            from: ChatMessageFrom {
                profile_id: "bridge-bot".into(),
                name: "Bridge Bot".into(),
            },
            parts: vec![MessagePart::text("hello")],
            alert: ChatAlert {
                title: "Bridge Bot".into(),
                body: Some("hello".into()),
            },
            direction: "outbound",
            is_automated_send: true,
            body: Some("hello".into()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["from"]["profileId"], "bridge-bot");
        assert_eq!(value["isAutomatedSend"], true);
        assert_eq!(value["parts"][0]["type"], "text/plain");
        assert_eq!(value["parts"][0]["size"], 5);
    }

    #[test]
    fn media_kind_prefix_classification() {
        assert_eq!(MediaKind::from_mime("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("audio/ogg"), MediaKind::Audio);
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("text/csv"), MediaKind::File);
        assert_eq!(MediaKind::from_mime(""), MediaKind::File);
    }
}
