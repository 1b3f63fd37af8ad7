//! Downstream HTTP clients for the two platforms.
//!
//! Both sit behind small traits so the dispatcher can be exercised with mock
//! sinks in tests. Every call shares one `reqwest::Client` carrying the fixed
//! per-call timeout; a timeout surfaces as a transport error like any other
//! network failure.

use async_trait::async_trait;
use cmb_core::{BotRequest, BridgeConfig, ChatMessageRequest};
use cmb_translator::BotEndpoint;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DownstreamError {
    #[error("downstream call failed with HTTP status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("downstream transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for DownstreamError {
    fn from(err: reqwest::Error) -> Self {
        DownstreamError::Transport(err.to_string())
    }
}

/// Delivery surface of the bot platform.
#[async_trait]
pub trait BotSink: Send + Sync {
    async fn deliver(
        &self,
        endpoint: BotEndpoint,
        request: &BotRequest,
    ) -> Result<(), DownstreamError>;
}

/// Delivery surface of the chat platform.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_message(
        &self,
        chat_id: &str,
        request: &ChatMessageRequest,
    ) -> Result<(), DownstreamError>;

    async fn set_typing(&self, chat_id: &str, on: bool) -> Result<(), DownstreamError>;
}

/// Client for the Meya receive/media endpoints, authenticated with basic auth
/// (API key as username, empty password).
pub struct MeyaClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl MeyaClient {
    pub fn new(http: reqwest::Client, config: &BridgeConfig) -> Self {
        Self {
            http,
            api_key: config.meya_api_key.clone(),
            api_base: config.meya_api_base.clone(),
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl BotSink for MeyaClient {
    async fn deliver(
        &self,
        endpoint: BotEndpoint,
        request: &BotRequest,
    ) -> Result<(), DownstreamError> {
        let url = self.build_url(endpoint.path());
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_key, Some(""))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        // The bot platform answers exactly 200 on success.
        if status.as_u16() != 200 {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "bot platform call failed");
            return Err(DownstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(%url, "bot platform call succeeded");
        Ok(())
    }
}

/// Client for the Comapi chat REST API, authenticated with a bearer token.
pub struct ComapiClient {
    http: reqwest::Client,
    access_token: String,
    api_base: String,
    api_space: String,
}

impl ComapiClient {
    pub fn new(http: reqwest::Client, config: &BridgeConfig) -> Self {
        Self {
            http,
            access_token: config.access_token.clone(),
            api_base: config.comapi_api_base.clone(),
            api_space: config.api_space.clone(),
        }
    }

    fn chat_url(&self, chat_id: &str, resource: &str) -> String {
        format!(
            "{}/apispaces/{}/chats/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.api_space,
            chat_id,
            resource
        )
    }
}

#[async_trait]
impl ChatSink for ComapiClient {
    async fn send_message(
        &self,
        chat_id: &str,
        request: &ChatMessageRequest,
    ) -> Result<(), DownstreamError> {
        let url = self.chat_url(chat_id, "messages");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("cache-control", "no-cache")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !matches!(status.as_u16(), 200 | 201) {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "chat message post failed");
            return Err(DownstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(%url, "chat message posted");
        Ok(())
    }

    async fn set_typing(&self, chat_id: &str, on: bool) -> Result<(), DownstreamError> {
        let url = self.chat_url(chat_id, "typing");
        let builder = if on {
            self.http.post(&url)
        } else {
            self.http.delete(&url)
        };
        let response = builder
            .bearer_auth(&self.access_token)
            .header("cache-control", "no-cache")
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 204 {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), on, "typing indicator call failed");
            return Err(DownstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(%url, on, "typing indicator updated");
        Ok(())
    }
}
