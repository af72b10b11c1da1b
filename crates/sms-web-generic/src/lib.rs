use std::sync::Arc;

use sms_core::{
    Headers, HttpStatus, InboundEvent, InboundMessage, InboundRegistry, InboundWebhook,
    WebhookError, WebhookResponse,
};
use tracing::{debug, warn};

/// Framework-agnostic webhook processor that handles the core SMS logic
#[derive(Clone)]
pub struct WebhookProcessor {
    registry: InboundRegistry,
}

impl WebhookProcessor {
    pub fn new(registry: InboundRegistry) -> Self {
        Self { registry }
    }

    /// Process a webhook addressed to a named provider
    pub fn process_webhook(
        &self,
        provider: &str,
        headers: Headers,
        body: &[u8],
    ) -> WebhookResponse {
        match self.process_named(provider, &headers, body) {
            Ok(messages) => WebhookResponse::success(&messages),
            Err(e) => self.error_to_response(e),
        }
    }

    /// Process a webhook whose provider is recognized from the payload itself
    pub fn process_detected(&self, headers: Headers, body: &[u8]) -> WebhookResponse {
        match self.process_any(&headers, body) {
            Ok(messages) => WebhookResponse::success(&messages),
            Err(e) => self.error_to_response(e),
        }
    }

    fn process_named(
        &self,
        provider: &str,
        headers: &Headers,
        body: &[u8],
    ) -> Result<Vec<InboundMessage>, WebhookError> {
        let hook = self
            .registry
            .get(provider)
            .ok_or_else(|| WebhookError::ProviderNotFound(provider.to_string()))?;
        let event = decode(headers, body)?;
        if !hook.matches(&event) {
            return Err(WebhookError::NoMatchingProvider);
        }
        extract(hook, event)
    }

    fn process_any(
        &self,
        headers: &Headers,
        body: &[u8],
    ) -> Result<Vec<InboundMessage>, WebhookError> {
        let event = decode(headers, body)?;
        let hook = self
            .registry
            .detect(&event)
            .ok_or(WebhookError::NoMatchingProvider)?;
        extract(hook, event)
    }

    fn error_to_response(&self, error: WebhookError) -> WebhookResponse {
        warn!("webhook rejected: {}", error);
        match error {
            WebhookError::ProviderNotFound(_) => {
                WebhookResponse::error(HttpStatus::NotFound, "unknown provider")
            }
            WebhookError::NoMatchingProvider => {
                WebhookResponse::error(HttpStatus::NotFound, "no matching provider")
            }
            WebhookError::ParseError(msg) => {
                WebhookResponse::error(HttpStatus::BadRequest, &format!("parse error: {}", msg))
            }
            WebhookError::SmsError(e) => WebhookResponse::error(
                HttpStatus::InternalServerError,
                &format!("SMS error: {}", e),
            ),
        }
    }
}

fn decode(headers: &Headers, body: &[u8]) -> Result<InboundEvent, WebhookError> {
    InboundEvent::decode(headers, body).map_err(|e| WebhookError::ParseError(e.to_string()))
}

fn extract(
    hook: Arc<dyn InboundWebhook>,
    event: InboundEvent,
) -> Result<Vec<InboundMessage>, WebhookError> {
    debug!(provider = hook.provider(), "extracting inbound messages");
    Ok(hook.extract(event)?)
}

/// Helper trait for framework adapters to convert headers
pub trait HeaderConverter {
    type HeaderType;

    fn to_generic_headers(headers: &Self::HeaderType) -> Headers;
}

/// Helper trait for framework adapters to convert responses
pub trait ResponseConverter {
    type ResponseType;

    fn from_webhook_response(response: WebhookResponse) -> Self::ResponseType;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_catapult::{CatapultClient, CatapultConfig};

    const CALLBACK: &str = "eventType=sms&direction=in&messageId=m-1\
        &messageUri=https%3A%2F%2Fapi.catapult.inetwork.com%2Fv1%2Fusers%2Fu%2Fmessages%2Fm-1\
        &from=%2B13233326955&to=%2B13865245000&text=Example&applicationId=a-1\
        &time=2012-11-14T16%3A13%3A06.076Z&state=received";

    fn processor() -> WebhookProcessor {
        let client = CatapultClient::new(CatapultConfig::new("u", "t", "s"));
        WebhookProcessor::new(InboundRegistry::new().with(Arc::new(client)))
    }

    #[test]
    fn processor_handles_unknown_provider() {
        let registry = InboundRegistry::new();
        let processor = WebhookProcessor::new(registry);

        let response = processor.process_webhook("unknown", vec![], b"test");
        assert_eq!(response.status.as_u16(), 404);
        assert!(response.body.contains("unknown provider"));
    }

    #[test]
    fn processor_detects_catapult() {
        let response = processor().process_detected(vec![], CALLBACK.as_bytes());
        assert_eq!(response.status.as_u16(), 200);

        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body[0]["from"], "+13233326955");
        assert_eq!(body[0]["text"], "Example");
        assert_eq!(body[0]["provider"], "catapult");
    }

    #[test]
    fn processor_handles_named_catapult() {
        let response = processor().process_webhook("catapult", vec![], CALLBACK.as_bytes());
        assert_eq!(response.status.as_u16(), 200);
    }

    #[test]
    fn processor_rejects_foreign_payload() {
        let response = processor().process_detected(vec![], b"From=%2B1&To=%2B2&Text=hi");
        assert_eq!(response.status.as_u16(), 404);
        assert!(response.body.contains("no matching provider"));

        let response = processor().process_webhook("catapult", vec![], b"text=hi");
        assert_eq!(response.status.as_u16(), 404);
    }

    #[test]
    fn processor_reports_undecodable_json() {
        let headers = vec![("content-type".to_string(), "application/json".to_string())];
        let response = processor().process_detected(headers, b"{not json");
        assert_eq!(response.status.as_u16(), 400);
        assert!(response.body.contains("parse error"));
    }
}
