//! Bot → chat translation: one bot event becomes at most one chat call.

use std::fmt::Write as _;

use cmb_core::{
    BotEvent, BotEventKind, Card, CardKind, ChatAlert, ChatMessageFrom, ChatMessageRequest,
    CompositeId, MessagePart, Sender, TypingStatus,
};

use crate::TranslateError;

/// Notification text used when a card degrades to a media attachment.
const MEDIA_ALERT_BODY: &str = "You have received a picture";

/// Identity stamped on every outbound chat message.
#[derive(Debug, Clone)]
pub struct BotIdentity {
    pub profile_id: String,
    pub name: String,
}

/// Outcome of planning a bot event.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatDispatch {
    /// Not a bot event, or an event kind with no chat-side counterpart.
    Ignore,
    /// Toggle the typing indicator for the chat.
    Typing { chat: CompositeId, on: bool },
    /// Post a chat message.
    Message {
        chat: CompositeId,
        request: ChatMessageRequest,
    },
    /// Payload is recognized but has no translation; acknowledge with the
    /// reason and skip the downstream call.
    Unsupported { reason: String },
}

/// Plans the chat call for a bot event.
///
/// Only `sender == bot` events are processed. Typing events toggle the typing
/// indicator, text events become a single-part plain text message, and cards
/// either attach media (image) or degrade to a text listing (text_buttons).
pub fn plan_chat_dispatch(
    event: &BotEvent,
    bot: &BotIdentity,
) -> Result<ChatDispatch, TranslateError> {
    if event.sender != Sender::Bot {
        return Ok(ChatDispatch::Ignore);
    }

    match event.kind {
        BotEventKind::Typing => {
            let chat: CompositeId = event.user_id.parse()?;
            let status = event.status.ok_or(TranslateError::MissingTypingStatus)?;
            Ok(ChatDispatch::Typing {
                chat,
                on: status == TypingStatus::On,
            })
        }
        BotEventKind::Text => {
            let chat: CompositeId = event.user_id.parse()?;
            let text = event.text.clone().ok_or(TranslateError::MissingText)?;
            Ok(ChatDispatch::Message {
                chat,
                request: text_message(bot, &text),
            })
        }
        BotEventKind::Card => {
            let chat: CompositeId = event.user_id.parse()?;
            let card = event.card.as_ref().ok_or(TranslateError::MissingCard)?;
            card_message(bot, event, card).map(|dispatch| match dispatch {
                CardOutcome::Message(request) => ChatDispatch::Message { chat, request },
                CardOutcome::Unsupported(reason) => ChatDispatch::Unsupported { reason },
            })
        }
        BotEventKind::Unknown => Ok(ChatDispatch::Ignore),
    }
}

enum CardOutcome {
    Message(ChatMessageRequest),
    Unsupported(String),
}

fn text_message(bot: &BotIdentity, text: &str) -> ChatMessageRequest {
    ChatMessageRequest {
        from: from_block(bot),
        parts: vec![MessagePart::text(text)],
        alert: ChatAlert {
            title: bot.name.clone(),
            body: Some(text.to_string()),
        },
        direction: "outbound",
        is_automated_send: true,
        body: Some(text.to_string()),
    }
}

fn card_message(
    bot: &BotIdentity,
    event: &BotEvent,
    card: &Card,
) -> Result<CardOutcome, TranslateError> {
    match card.kind {
        CardKind::Image => {
            let url = card
                .image_url
                .clone()
                .ok_or(TranslateError::MissingImageUrl)?;
            let mime = mime_guess::from_path(&url)
                .first()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            Ok(CardOutcome::Message(ChatMessageRequest {
                from: from_block(bot),
                parts: vec![MessagePart {
                    name: event.text.clone(),
                    kind: mime,
                    data: None,
                    url: Some(url),
                    size: None,
                }],
                alert: ChatAlert {
                    title: bot.name.clone(),
                    body: Some(MEDIA_ALERT_BODY.to_string()),
                },
                direction: "outbound",
                is_automated_send: true,
                body: None,
            }))
        }
        CardKind::TextButtons => {
            let prompt = card.text.as_deref().unwrap_or_default();
            let mut combined = format!("{prompt} \n\nReply with one of: \n");
            for button in &card.buttons {
                let _ = writeln!(combined, "\"{}\" ", button.action);
            }
            Ok(CardOutcome::Message(ChatMessageRequest {
                from: from_block(bot),
                parts: vec![MessagePart::text(combined.clone())],
                alert: ChatAlert {
                    title: bot.name.clone(),
                    body: event.text.clone(),
                },
                direction: "outbound",
                is_automated_send: true,
                body: Some(combined),
            }))
        }
        CardKind::Unknown => Ok(CardOutcome::Unsupported(
            "unsupported card type, ignoring".into(),
        )),
    }
}

fn from_block(bot: &BotIdentity) -> ChatMessageFrom {
    ChatMessageFrom {
        profile_id: bot.profile_id.clone(),
        name: bot.name.clone(),
    }
}
