//! Chat → bot translation: one webhook event becomes zero or more bot calls.

use cmb_core::{BotRequest, ChatEvent, CompositeId, Direction, MediaKind};

use crate::TranslateError;

/// Bot platform endpoints a planned call can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotEndpoint {
    Receive,
    Media,
}

impl BotEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            BotEndpoint::Receive => "/receive",
            BotEndpoint::Media => "/media",
        }
    }
}

/// One downstream call planned from an inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct BotCall {
    pub endpoint: BotEndpoint,
    pub request: BotRequest,
}

/// Outcome of planning an inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundPlan {
    /// Event is not a user chat message; acknowledge and drop.
    Ignore,
    /// Dispatch these calls in order, stopping at the first failure.
    Deliver(Vec<BotCall>),
}

/// Plans the bot calls for an inbound chat event.
///
/// Only `chatMessage.sent` events with an inbound direction produce calls;
/// each message part maps to exactly one call, in part order. Text parts go to
/// the receive endpoint with the part's data. Any other part is a media call
/// built from the first `messageParts` entry, which carries the canonical URL
/// and MIME type for the attachment.
pub fn plan_bot_requests(event: &ChatEvent) -> Result<InboundPlan, TranslateError> {
    if !event.is_message_sent() || event.payload.context.direction != Direction::Inbound {
        return Ok(InboundPlan::Ignore);
    }

    let context = &event.payload.context;
    let user_id = CompositeId::new(context.from.id.clone(), context.chat_id.clone()).encode();

    let mut calls = Vec::with_capacity(event.payload.parts.len());
    for part in &event.payload.parts {
        if part.is_text() {
            calls.push(BotCall {
                endpoint: BotEndpoint::Receive,
                request: BotRequest::text(
                    user_id.clone(),
                    part.data.clone().unwrap_or_default(),
                ),
            });
        } else {
            let source = event
                .payload
                .message_parts
                .first()
                .ok_or(TranslateError::MissingMediaSource)?;
            let url = source
                .url
                .clone()
                .ok_or(TranslateError::MissingMediaUrl)?;
            calls.push(BotCall {
                endpoint: BotEndpoint::Media,
                request: BotRequest::media(
                    user_id.clone(),
                    url,
                    MediaKind::from_mime(&source.kind),
                ),
            });
        }
    }

    Ok(InboundPlan::Deliver(calls))
}
