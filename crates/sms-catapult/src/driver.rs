use std::collections::BTreeMap;
use std::sync::OnceLock;

use sms_core::{ApiResponse, Headers, InboundEvent, InboundMessage, Reply, SmsError, User};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{
    CatapultClient, PayloadOverrides, ServicePayload, INCOMING_KEYS, MESSAGE_URI_HOST, PROVIDER,
    SEND_ENDPOINT,
};

/// Handles a single inbound webhook request.
///
/// The normalized messages are computed on first access and then reused, so
/// repeated calls to [`CatapultDriver::messages`] hand out the same instances.
#[derive(Debug)]
pub struct CatapultDriver<'a> {
    client: &'a CatapultClient,
    event: InboundEvent,
    messages: OnceLock<Vec<InboundMessage>>,
}

impl<'a> CatapultDriver<'a> {
    pub fn new(client: &'a CatapultClient, event: InboundEvent) -> Self {
        Self {
            client,
            event,
            messages: OnceLock::new(),
        }
    }

    /// Decode the request body and wrap it in a driver.
    pub fn from_request(
        client: &'a CatapultClient,
        headers: &Headers,
        body: &[u8],
    ) -> Result<Self, SmsError> {
        Ok(Self::new(client, InboundEvent::decode(headers, body)?))
    }

    pub fn name(&self) -> &'static str {
        PROVIDER
    }

    pub fn event(&self) -> &InboundEvent {
        &self.event
    }

    /// Whether the request is a Catapult message callback.
    pub fn matches_request(&self) -> bool {
        matches_event(&self.event)
    }

    pub fn messages(&self) -> &[InboundMessage] {
        self.messages
            .get_or_init(|| vec![normalize(&self.event)])
            .as_slice()
    }

    /// The webhook carries no profile data, so only the id is known.
    pub fn user(&self, message: &InboundMessage) -> User {
        User::new(message.from.clone())
    }

    pub fn is_bot(&self) -> bool {
        false
    }

    pub fn is_configured(&self) -> bool {
        self.client.config().is_configured()
    }

    /// Build the parameters for answering `matching`.
    ///
    /// The reply goes back to the sender, from the number the message was sent
    /// to (or the configured sender when that is empty). Overrides replace any
    /// field except `text`, which always comes from `reply`.
    pub fn build_service_payload(
        &self,
        reply: impl Into<Reply>,
        matching: &InboundMessage,
        overrides: &PayloadOverrides,
    ) -> ServicePayload {
        let config = self.client.config();
        let from = if matching.to.is_empty() {
            config.sender.as_deref().unwrap_or_default()
        } else {
            matching.to.as_str()
        };

        let reply = reply.into();
        let mut payload = ServicePayload::new(config, &matching.from, from, "");
        payload.merge(overrides);
        payload.text = reply.display_text().to_string();
        payload
    }

    pub async fn send_payload(&self, payload: &ServicePayload) -> Result<ApiResponse, SmsError> {
        info!(to = %payload.to, from = %payload.from, "sending SMS via catapult");
        self.client.post(SEND_ENDPOINT, &payload.pairs()).await
    }

    /// Low-level call to any Catapult endpoint.
    ///
    /// Credentials are filled in as defaults; entries in `params` win on collision.
    pub async fn send_request(
        &self,
        endpoint: &str,
        params: &BTreeMap<String, String>,
        matching: &InboundMessage,
    ) -> Result<ApiResponse, SmsError> {
        let config = self.client.config();
        let mut merged: BTreeMap<&str, &str> = BTreeMap::from([
            ("user_id", config.user_id.as_str()),
            ("app_token", config.app_token.as_str()),
            ("app_secret", config.app_secret.as_str()),
        ]);
        merged.extend(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        debug!(endpoint, sender = %matching.from, "sending catapult request");
        let pairs: Vec<(&str, &str)> = merged.into_iter().collect();
        self.client.post(endpoint, &pairs).await
    }
}

/// All message callback fields present and `messageUri` pointing at the Catapult API.
pub fn matches_event(event: &InboundEvent) -> bool {
    if let Some(missing) = INCOMING_KEYS.iter().find(|key| !event.contains_key(key)) {
        debug!(missing, "not a catapult event");
        return false;
    }
    match event.get("messageUri") {
        Some(uri) if uri.contains(MESSAGE_URI_HOST) => true,
        uri => {
            debug!(?uri, "messageUri does not point at catapult");
            false
        }
    }
}

fn normalize(event: &InboundEvent) -> InboundMessage {
    let field = |key: &str| event.get(key).unwrap_or_default().to_string();
    InboundMessage {
        id: event.get("messageId").map(str::to_string),
        from: field("from"),
        to: field("to"),
        text: field("text"),
        timestamp: event
            .get("time")
            .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok()),
        provider: PROVIDER,
        raw: event.to_json(),
    }
}
