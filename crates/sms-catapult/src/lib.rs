//! # Catapult SMS Provider
//!
//! Catapult (Bandwidth) webhook adapter for catapult-bridge.
//!
//! - Recognize Catapult message callbacks among other providers' webhooks
//! - Normalize the callback into an [`InboundMessage`]
//! - Build and send the reply parameters
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_catapult::{CatapultClient, CatapultConfig, PayloadOverrides};
//!
//! let client = CatapultClient::new(CatapultConfig::new("user_id", "token", "secret"));
//! let driver = client.driver(event);
//! if driver.matches_request() {
//!     let message = &driver.messages()[0];
//!     let payload = driver.build_service_payload("Thanks!", message, &PayloadOverrides::new());
//!     driver.send_payload(&payload).await?;
//! }
//! ```

mod client;
mod config;
mod driver;
mod payload;

pub use client::CatapultClient;
pub use config::CatapultConfig;
pub use driver::{matches_event, CatapultDriver};
pub use payload::{PayloadOverrides, ServicePayload};

use async_trait::async_trait;
use sms_core::{
    InboundEvent, InboundMessage, InboundWebhook, SendRequest, SendResponse, SmsClient, SmsError,
};
use tracing::info;

pub const PROVIDER: &str = "catapult";

pub const DEFAULT_BASE_URL: &str = "https://api.catapult.inetwork.com";

/// Host every genuine `messageUri` points at.
pub const MESSAGE_URI_HOST: &str = "api.catapult.inetwork.com";

pub const SEND_ENDPOINT: &str = "sms/json";

/// Fields present in every Catapult message callback.
pub const INCOMING_KEYS: [&str; 10] = [
    "eventType",
    "direction",
    "messageId",
    "messageUri",
    "from",
    "to",
    "text",
    "applicationId",
    "time",
    "state",
];

#[async_trait]
impl SmsClient for CatapultClient {
    async fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        let payload = ServicePayload::new(self.config(), req.to, req.from, req.text);
        let res = self.driver(InboundEvent::new()).send_payload(&payload).await?;

        let raw: serde_json::Value = serde_json::from_str(&res.body)
            .unwrap_or_else(|_| serde_json::json!({ "raw": res.body }));
        let id = raw
            .get("messageId")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(sms_core::fallback_id);
        info!(%id, "catapult accepted SMS");

        Ok(SendResponse {
            id,
            provider: PROVIDER,
            raw,
        })
    }
}

impl InboundWebhook for CatapultClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn matches(&self, event: &InboundEvent) -> bool {
        matches_event(event)
    }

    fn extract(&self, event: InboundEvent) -> Result<Vec<InboundMessage>, SmsError> {
        Ok(self.driver(event).messages().to_vec())
    }
}
