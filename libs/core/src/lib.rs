//! Shared building blocks for the Comapi/Meya bridge.
//!
//! Wire types for both webhook directions, the composite identity codec that
//! threads a chat address through the bot platform, and the process-wide
//! configuration loaded once at startup.

pub mod config;
pub mod identity;
pub mod types;

pub use config::{BridgeConfig, ConfigError};
pub use identity::{CompositeId, IdentityError};
pub use types::*;
