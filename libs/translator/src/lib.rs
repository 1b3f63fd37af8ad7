//! Translation between the two webhook vocabularies.
//!
//! Both directions are pure planning functions over [`cmb_core`] types: they
//! never perform I/O, so the gateway decides how to dispatch the planned calls
//! and how to map failures onto a single HTTP response.

use thiserror::Error;

pub mod inbound;
pub mod outbound;

pub use inbound::{BotCall, BotEndpoint, InboundPlan, plan_bot_requests};
pub use outbound::{BotIdentity, ChatDispatch, plan_chat_dispatch};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("media part present but messageParts is empty")]
    MissingMediaSource,
    #[error("media source part has no url")]
    MissingMediaUrl,
    #[error("typing event has no status")]
    MissingTypingStatus,
    #[error("text event has no text")]
    MissingText,
    #[error("card event has no card")]
    MissingCard,
    #[error("image card has no image_url")]
    MissingImageUrl,
    #[error(transparent)]
    Identity(#[from] cmb_core::IdentityError),
}
