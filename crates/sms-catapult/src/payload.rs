use std::collections::BTreeMap;

use crate::CatapultConfig;

/// Caller-supplied fields merged over a [`ServicePayload`].
pub type PayloadOverrides = BTreeMap<String, String>;

/// Parameters for one outbound SMS, sent as `key=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePayload {
    pub user_id: String,
    pub app_token: String,
    pub app_secret: String,
    pub to: String,
    pub from: String,
    pub text: String,
    /// Override fields with no dedicated slot.
    pub extra: BTreeMap<String, String>,
}

impl ServicePayload {
    pub fn new(config: &CatapultConfig, to: &str, from: &str, text: &str) -> Self {
        Self {
            user_id: config.user_id.clone(),
            app_token: config.app_token.clone(),
            app_secret: config.app_secret.clone(),
            to: to.to_string(),
            from: from.to_string(),
            text: text.to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// Apply overrides on top of the current fields; overrides win on every key.
    pub fn merge(&mut self, overrides: &PayloadOverrides) {
        for (key, value) in overrides {
            let slot = match key.as_str() {
                "user_id" => &mut self.user_id,
                "app_token" => &mut self.app_token,
                "app_secret" => &mut self.app_secret,
                "to" => &mut self.to,
                "from" => &mut self.from,
                "text" => &mut self.text,
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                    continue;
                }
            };
            *slot = value.clone();
        }
    }

    /// Fields in wire order: credentials, addressing, extras, then text.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = vec![
            ("user_id", self.user_id.as_str()),
            ("app_token", self.app_token.as_str()),
            ("app_secret", self.app_secret.as_str()),
            ("to", self.to.as_str()),
            ("from", self.from.as_str()),
        ];
        pairs.extend(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        pairs.push(("text", self.text.as_str()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ServicePayload {
        let config = CatapultConfig::new("user_id", "token", "secret");
        ServicePayload::new(&config, "123456", "987654", "string")
    }

    #[test]
    fn merge_overrides_known_and_unknown_keys() {
        let mut p = payload();
        let overrides: PayloadOverrides = [
            ("from".to_string(), "custom".to_string()),
            ("app_token".to_string(), "other".to_string()),
            ("media".to_string(), "https://example.com/a.png".to_string()),
        ]
        .into_iter()
        .collect();
        p.merge(&overrides);

        assert_eq!(p.from, "custom");
        assert_eq!(p.app_token, "other");
        assert_eq!(p.to, "123456");
        assert_eq!(p.extra.get("media").map(String::as_str), Some("https://example.com/a.png"));
    }

    #[test]
    fn pairs_keep_credentials_first_and_text_last() {
        let mut p = payload();
        p.extra.insert("tag".to_string(), "x".to_string());
        assert_eq!(
            p.pairs(),
            vec![
                ("user_id", "user_id"),
                ("app_token", "token"),
                ("app_secret", "secret"),
                ("to", "123456"),
                ("from", "987654"),
                ("tag", "x"),
                ("text", "string"),
            ]
        );
    }
}
