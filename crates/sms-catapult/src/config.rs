use serde::{Deserialize, Serialize};

/// Catapult provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatapultConfig {
    /// Catapult user id (account id)
    #[serde(default)]
    pub user_id: String,
    /// API token
    #[serde(default)]
    pub app_token: String,
    /// API secret
    #[serde(default)]
    pub app_secret: String,
    /// Number used as `from` when the inbound message has no recipient
    #[serde(default)]
    pub sender: Option<String>,
}

impl CatapultConfig {
    pub fn new<S: Into<String>>(user_id: S, app_token: S, app_secret: S) -> Self {
        Self {
            user_id: user_id.into(),
            app_token: app_token.into(),
            app_secret: app_secret.into(),
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// True when all three credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.user_id.is_empty() && !self.app_token.is_empty() && !self.app_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_needs_every_credential() {
        assert!(CatapultConfig::new("user_id", "token", "secret").is_configured());
        assert!(!CatapultConfig::new("", "token", "secret").is_configured());
        assert!(!CatapultConfig::new("user_id", "", "secret").is_configured());
        assert!(!CatapultConfig::new("user_id", "token", "").is_configured());
        assert!(!CatapultConfig::default().is_configured());
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: CatapultConfig =
            serde_json::from_str(r#"{"user_id":"u","sender":"004912345"}"#).unwrap();
        assert_eq!(config.user_id, "u");
        assert_eq!(config.app_token, "");
        assert_eq!(config.sender.as_deref(), Some("004912345"));
        assert!(!config.is_configured());
    }
}
