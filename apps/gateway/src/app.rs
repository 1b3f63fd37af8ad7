//! Webhook dispatcher: route wiring, signature checks and status mapping.
//!
//! The handlers contain no translation logic. They verify the request,
//! delegate to `cmb-translator` for a plan, drive the downstream sinks
//! sequentially, and write exactly one response per request.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use cmb_core::{BotEvent, BridgeConfig, ChatEvent};
use cmb_signing::{verify_canonical, verify_raw};
use cmb_translator::{BotIdentity, ChatDispatch, InboundPlan, plan_bot_requests, plan_chat_dispatch};

use crate::clients::{BotSink, ChatSink};

const CHAT_SIGNATURE_HEADER: &str = "x-comapi-signature";
const BOT_SIGNATURE_HEADER: &str = "x-meya-signature";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub bot: Arc<dyn BotSink>,
    pub chat: Arc<dyn ChatSink>,
}

impl AppState {
    fn bot_identity(&self) -> BotIdentity {
        BotIdentity {
            profile_id: self.config.bot_profile_id.clone(),
            name: self.config.bot_display_name.clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/botInbound", get(inbound_probe).post(bot_inbound))
        .route("/botOutbound", get(outbound_probe).post(bot_outbound))
        .with_state(state)
}

async fn index() -> &'static str {
    "Comapi/Meya bridge is running"
}

async fn inbound_probe() -> &'static str {
    "POST Comapi webhook events here"
}

async fn outbound_probe() -> &'static str {
    "POST Meya bot events here"
}

/// Accepts Comapi webhook events and forwards chat messages to the bot.
async fn bot_inbound(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "no JSON body found").into_response();
    }

    let Some(signature) = header_str(&headers, CHAT_SIGNATURE_HEADER) else {
        tracing::warn!("inbound webhook missing signature header");
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if !verify_raw(&state.config.webhook_secret, &body, signature) {
        tracing::warn!("inbound webhook signature mismatch");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: ChatEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(error) => {
            tracing::warn!(%error, "inbound payload parse error");
            return (StatusCode::BAD_REQUEST, "invalid JSON body").into_response();
        }
    };
    tracing::info!(name = %event.name, event_id = %event.event_id, "received chat event");

    let plan = match plan_bot_requests(&event) {
        Ok(plan) => plan,
        Err(error) => {
            tracing::error!(%error, "inbound translation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response();
        }
    };

    match plan {
        InboundPlan::Ignore => {
            tracing::debug!(name = %event.name, "not an inbound chat message, ignoring");
            StatusCode::OK.into_response()
        }
        InboundPlan::Deliver(calls) => {
            // Parts are delivered in order; the first failure short-circuits
            // and produces the only response.
            for call in &calls {
                if let Err(error) = state.bot.deliver(call.endpoint, &call.request).await {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("call to bot platform failed: {error}"),
                    )
                        .into_response();
                }
            }
            StatusCode::OK.into_response()
        }
    }
}

/// Accepts Meya bot events and relays them into the chat.
async fn bot_outbound(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "no JSON body found").into_response();
    }

    let Some(signature) = header_str(&headers, BOT_SIGNATURE_HEADER) else {
        tracing::warn!("outbound webhook missing signature header");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, "outbound payload parse error");
            return (StatusCode::BAD_REQUEST, "invalid JSON body").into_response();
        }
    };

    // The bot platform signs the full URL it called plus the canonical body;
    // the externally visible base comes from configuration rather than from
    // spoofable Host headers. The query string is part of the signed URL.
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let full_url = format!("{}{}", state.config.public_url, path_and_query);
    if !verify_canonical(&state.config.meya_api_key, &full_url, &value, signature) {
        tracing::warn!("outbound webhook signature mismatch");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: BotEvent = match serde_json::from_value(value) {
        Ok(event) => event,
        Err(error) => {
            tracing::warn!(%error, "outbound payload did not match the bot event schema");
            return (StatusCode::BAD_REQUEST, "invalid JSON body").into_response();
        }
    };
    tracing::info!(kind = ?event.kind, sender = ?event.sender, "received bot event");

    let dispatch = match plan_chat_dispatch(&event, &state.bot_identity()) {
        Ok(dispatch) => dispatch,
        Err(error) => {
            tracing::error!(%error, "outbound translation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response();
        }
    };

    match dispatch {
        ChatDispatch::Ignore => {
            tracing::debug!("bot event has no chat-side action, ignoring");
            StatusCode::OK.into_response()
        }
        ChatDispatch::Unsupported { reason } => {
            tracing::info!(%reason, "acknowledging unsupported payload");
            (StatusCode::OK, reason).into_response()
        }
        ChatDispatch::Typing { chat, on } => {
            match state.chat.set_typing(&chat.chat_id, on).await {
                Ok(()) => StatusCode::OK.into_response(),
                Err(error) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("call to chat platform failed: {error}"),
                )
                    .into_response(),
            }
        }
        ChatDispatch::Message { chat, request } => {
            match state.chat.send_message(&chat.chat_id, &request).await {
                Ok(()) => StatusCode::OK.into_response(),
                Err(error) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("call to chat platform failed: {error}"),
                )
                    .into_response(),
            }
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
