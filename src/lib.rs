//! # Catapult Bridge
//!
//! Lets a chat-bot framework receive and answer SMS through Catapult (Bandwidth) webhooks.
//!
//! ## Features
//!
//! - **Request recognition**: tells Catapult message callbacks apart from other providers
//! - **Normalization**: maps the callback fields onto a provider-neutral message
//! - **Replies**: builds the credential-bearing send parameters and posts them
//! - **Framework agnostic**: webhook processing usable from Axum or any HTTP framework
//! - **Configuration**: layered file and environment configuration
//! - **Observability**: structured logging through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catapult_bridge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = AppConfig::load()?;
//!     catapult_bridge::logging::init(&config.logging)?;
//!
//!     let app = router(AppState { registry: config.registry() });
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [providers.catapult]
//! user_id = "u-123"
//! app_token = "t-123"
//! app_secret = "s-123"
//! sender = "+15550001111"
//! ```

pub mod config;
pub mod logging;

pub use crate::config::*;

/// Common imports for Catapult Bridge usage
pub mod prelude {
    pub use crate::config::{AppConfig, LoggingConfig, ProvidersConfig, ServerConfig};
    pub use sms_catapult::{
        CatapultClient, CatapultConfig, CatapultDriver, PayloadOverrides, ServicePayload,
    };
    pub use sms_core::*;
    pub use sms_web_axum::{router, AppState};
    pub use sms_web_generic::WebhookProcessor;
}
