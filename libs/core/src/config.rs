use std::env;

use thiserror::Error;

/// Process-wide configuration, loaded once at startup and injected into the
/// handlers. Nothing reads environment variables after this point.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Shared secret for the raw-body HMAC on inbound Comapi webhooks.
    pub webhook_secret: String,
    /// Meya webhook key; signs outbound-webhook verification input and
    /// authenticates calls to the bot platform.
    pub meya_api_key: String,
    /// Comapi API space id used in REST paths.
    pub api_space: String,
    /// Bearer token for Comapi REST calls.
    pub access_token: String,
    /// Externally visible base URL of this service, without a trailing slash.
    /// Used to reconstruct the full request URL for signature verification.
    pub public_url: String,
    pub meya_api_base: String,
    pub comapi_api_base: String,
    /// Identity stamped on outbound chat messages.
    pub bot_profile_id: String,
    pub bot_display_name: String,
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            webhook_secret: required("COMAPI_WEBHOOK_SECRET")?,
            meya_api_key: required("MEYA_API_KEY")?,
            api_space: required("COMAPI_API_SPACE")?,
            access_token: required("COMAPI_ACCESS_TOKEN")?,
            public_url: required("PUBLIC_URL")?.trim_end_matches('/').to_string(),
            meya_api_base: env::var("MEYA_API_BASE")
                .unwrap_or_else(|_| "https://api.meya.ai".into()),
            comapi_api_base: env::var("COMAPI_API_BASE")
                .unwrap_or_else(|_| "https://api.comapi.com".into()),
            bot_profile_id: env::var("BOT_PROFILE_ID").unwrap_or_else(|_| "bridge-bot".into()),
            bot_display_name: env::var("BOT_DISPLAY_NAME")
                .unwrap_or_else(|_| "Bridge bot".into()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}
