//! # SMS Core
//!
//! Core traits and types shared by the catapult-bridge crates.
//!
//! This crate provides the fundamental building blocks for SMS webhook adapters:
//! - [`InboundEvent`], the flat field bag a provider posts to a webhook
//! - [`InboundMessage`], the framework-neutral shape an event is normalized into
//! - [`Reply`], the outgoing message shapes that resolve to a display text
//! - [`InboundWebhook`] and [`SmsClient`] traits implemented by each provider
//! - [`InboundRegistry`] for selecting the provider that owns a request
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{InboundEvent, InboundRegistry};
//!
//! let event = InboundEvent::from_form(body)?;
//! if let Some(hook) = registry.detect(&event) {
//!     let messages = hook.extract(event)?;
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// Errors that can occur during SMS operations
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// HTTP communication error
    #[error("http error: {0}")]
    Http(String),
    /// Invalid request parameters or undecodable payload
    #[error("invalid request: {0}")]
    Invalid(String),
    /// SMS provider returned an error
    #[error("provider error: {0}")]
    Provider(String),
    /// Unexpected error occurred
    #[error("unexpected: {0}")]
    Unexpected(String),
}

/// Web-specific error types for webhook processing
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("provider not found: {0}")]
    ProviderNotFound(String),
    #[error("no registered provider matches the request")]
    NoMatchingProvider,
    #[error("parsing failed: {0}")]
    ParseError(String),
    #[error("SMS processing error: {0}")]
    SmsError(#[from] SmsError),
}

/// HTTP status code for web responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Raw webhook fields, keyed by the provider's field names.
///
/// Values are kept verbatim. Keys are ordered so the event serializes the
/// same way every time it is echoed back in [`InboundMessage::raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InboundEvent(BTreeMap<String, String>);

impl InboundEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body. Repeated keys keep the last value.
    pub fn from_form(body: &[u8]) -> Result<Self, SmsError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| SmsError::Invalid(format!("form decode: {}", e)))?;
        Ok(pairs.into_iter().collect())
    }

    /// Decode a JSON object body.
    ///
    /// Non-string scalars are stringified and `null` becomes the empty string,
    /// so a key that is present in the body is always present in the event.
    pub fn from_json(body: &[u8]) -> Result<Self, SmsError> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)
            .map_err(|e| SmsError::Invalid(format!("json decode: {}", e)))?;
        Ok(object
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect())
    }

    /// Decode a body according to its `content-type` header, defaulting to form encoding.
    pub fn decode(headers: &Headers, body: &[u8]) -> Result<Self, SmsError> {
        let is_json = headers.iter().any(|(k, v)| {
            k.eq_ignore_ascii_case("content-type") && v.to_ascii_lowercase().contains("json")
        });
        if is_json {
            Self::from_json(body)
        } else {
            Self::from_form(body)
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InboundEvent {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest<'a> {
    pub to: &'a str,
    pub from: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub id: String,
    /// Name of the backend/provider that produced the response, e.g. "catapult".
    pub provider: &'static str,
    /// Raw provider payload for debugging / audit.
    pub raw: serde_json::Value,
}

/// Transport response handed back untouched by low-level provider calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Normalized inbound message (e.g., a reply).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: Option<String>,
    /// Sender of the message.
    pub from: String,
    /// Recipient of the message; empty when the provider did not say.
    pub to: String,
    pub text: String,
    pub timestamp: Option<OffsetDateTime>,
    pub provider: &'static str,
    pub raw: serde_json::Value,
}

/// Identity of the person behind an inbound message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    /// A user known only by id, with no profile data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            username: None,
        }
    }
}

/// Plain outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Question with optional answer buttons. Text-only channels send just the text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub buttons: Vec<String>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(label.into());
        self
    }
}

/// Anything a conversation can send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Message(OutgoingMessage),
    Question(Question),
}

impl Reply {
    /// The text shown to the recipient.
    pub fn display_text(&self) -> &str {
        match self {
            Reply::Text(text) => text,
            Reply::Message(message) => &message.text,
            Reply::Question(question) => &question.text,
        }
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<OutgoingMessage> for Reply {
    fn from(message: OutgoingMessage) -> Self {
        Reply::Message(message)
    }
}

impl From<Question> for Reply {
    fn from(question: Question) -> Self {
        Reply::Question(question)
    }
}

/// Generic webhook response that can be converted to any framework's response type
#[derive(Debug, Clone)]
pub struct WebhookResponse {
    pub status: HttpStatus,
    pub body: String,
    pub content_type: String,
}

impl WebhookResponse {
    pub fn success(messages: &[InboundMessage]) -> Self {
        Self {
            status: HttpStatus::Ok,
            body: serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string()),
            content_type: "application/json".to_string(),
        }
    }

    pub fn error(status: HttpStatus, message: &str) -> Self {
        Self {
            status,
            body: format!(r#"{{"error": "{}"}}"#, message.replace('"', r#"\""#)),
            content_type: "application/json".to_string(),
        }
    }
}

#[async_trait]
pub trait SmsClient: Send + Sync {
    /// Send a single text SMS.
    async fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError>;
}

/// Utility to create a pseudo id if a provider doesn't return one.
pub fn fallback_id() -> String {
    Uuid::new_v4().to_string()
}

/// Lightweight header representation to avoid tying the core to any HTTP framework.
pub type Headers = Vec<(String, String)>;

/// Provider-agnostic inbound webhook interface.
pub trait InboundWebhook: Send + Sync {
    /// Stable provider key, e.g., "catapult".
    fn provider(&self) -> &'static str;

    /// Whether the event was sent by this provider. Called for every registered
    /// provider on every auto-detected request, so it must stay cheap.
    fn matches(&self, event: &InboundEvent) -> bool;

    /// Normalize a decoded event into messages.
    fn extract(&self, event: InboundEvent) -> Result<Vec<InboundMessage>, SmsError>;

    /// Parse the incoming HTTP payload (headers + raw body) into normalized messages.
    fn parse_inbound(
        &self,
        headers: &Headers,
        body: &[u8],
    ) -> Result<Vec<InboundMessage>, SmsError> {
        self.extract(InboundEvent::decode(headers, body)?)
    }
}

/// Runtime registry so apps can register any combination of providers and treat them interchangeably.
#[derive(Default, Clone)]
pub struct InboundRegistry {
    map: Arc<BTreeMap<&'static str, Arc<dyn InboundWebhook>>>,
}

impl InboundRegistry {
    pub fn new() -> Self {
        Self {
            map: Arc::new(BTreeMap::new()),
        }
    }

    pub fn with(mut self, hook: Arc<dyn InboundWebhook>) -> Self {
        let mut m = (*self.map).clone();
        m.insert(hook.provider(), hook);
        self.map = Arc::new(m);
        self
    }

    pub fn get(&self, provider: &str) -> Option<Arc<dyn InboundWebhook>> {
        self.map.get(provider).cloned()
    }

    /// First provider, in provider-name order, that claims the event.
    pub fn detect(&self, event: &InboundEvent) -> Option<Arc<dyn InboundWebhook>> {
        self.map.values().find(|hook| hook.matches(event)).cloned()
    }

    pub fn providers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.keys().copied()
    }
}
