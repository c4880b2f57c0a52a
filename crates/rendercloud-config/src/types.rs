//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bind address for the webhook receiver.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5678";

/// Default path the webhook receiver listens on.
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderCloudConfig {
    /// API connection settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,

    /// Webhook receiver and subscription settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<WebhookConfig>,
}

impl RenderCloudConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Sections are replaced whole.
    pub fn merge(&mut self, other: RenderCloudConfig) {
        if other.api.is_some() {
            self.api = other.api;
        }
        if other.webhook.is_some() {
            self.webhook = other.webhook;
        }
    }

    /// The `[api]` section, or defaults.
    pub fn api(&self) -> ApiConfig {
        self.api.clone().unwrap_or_default()
    }

    /// The `[webhook]` section, or defaults.
    pub fn webhook(&self) -> WebhookConfig {
        self.webhook.clone().unwrap_or_default()
    }

    /// A starter config written by `config init`.
    pub fn template() -> Self {
        Self {
            api: Some(ApiConfig {
                base_url: Some("https://api.render.com/v1".to_string()),
                ..Default::default()
            }),
            webhook: Some(WebhookConfig {
                events: vec!["deploy_succeeded".to_string(), "deploy_failed".to_string()],
                ..Default::default()
            }),
        }
    }
}

/// `[api]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Override of the API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key (prefer the `RENDER_API_KEY` env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds. Unset leaves the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Whether an API key is stored in plaintext in this section.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// `[webhook]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Address the receiver binds to.
    pub bind_address: String,

    /// Path deliveries are posted to.
    pub path: String,

    /// Public callback URL registered with Render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    /// Workspace (owner) the subscription belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// Event types to subscribe to.
    pub events: Vec<String>,

    /// Restrict events to these services. Empty means all.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub service_ids: Vec<String>,

    /// Check `x-render-signature` on incoming deliveries.
    pub verify_signature: bool,

    /// Signing secret. Generated when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            path: DEFAULT_WEBHOOK_PATH.to_string(),
            public_url: None,
            owner_id: None,
            events: Vec::new(),
            service_ids: Vec::new(),
            verify_signature: true,
            secret: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = RenderCloudConfig::from_toml(
            r#"
[api]
base_url = "http://localhost:9000/v1"
api_key = "rnd_abc"
timeout_secs = 30

[webhook]
bind_address = "127.0.0.1:8080"
path = "/hooks/render"
public_url = "https://example.com/hooks/render"
owner_id = "tea-123"
events = ["deploy_succeeded", "deploy_failed"]
service_ids = ["srv-abc"]
verify_signature = false
"#,
        )
        .unwrap();

        let api = config.api();
        assert_eq!(api.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert!(api.has_plaintext_api_key());
        assert_eq!(api.timeout(), Some(Duration::from_secs(30)));

        let webhook = config.webhook();
        assert_eq!(webhook.bind_address, "127.0.0.1:8080");
        assert_eq!(webhook.path, "/hooks/render");
        assert_eq!(webhook.events.len(), 2);
        assert_eq!(webhook.service_ids, vec!["srv-abc"]);
        assert!(!webhook.verify_signature);
        assert!(webhook.secret.is_none());
    }

    #[test]
    fn test_webhook_defaults() {
        let config = RenderCloudConfig::from_toml("[webhook]\nowner_id = \"tea-1\"\n").unwrap();
        let webhook = config.webhook();
        assert_eq!(webhook.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(webhook.path, DEFAULT_WEBHOOK_PATH);
        assert!(webhook.verify_signature);
        assert!(webhook.events.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = RenderCloudConfig::from_toml("").unwrap();
        assert!(config.api.is_none());
        assert!(config.webhook.is_none());
        assert_eq!(config.api().timeout(), None);
    }

    #[test]
    fn test_merge_replaces_sections() {
        let mut base = RenderCloudConfig::from_toml(
            "[api]\nbase_url = \"http://a\"\n[webhook]\nowner_id = \"tea-1\"\n",
        )
        .unwrap();
        let overlay = RenderCloudConfig::from_toml("[api]\ntimeout_secs = 5\n").unwrap();
        base.merge(overlay);

        assert_eq!(base.api().base_url, None);
        assert_eq!(base.api().timeout_secs, Some(5));
        assert_eq!(base.webhook().owner_id.as_deref(), Some("tea-1"));
    }

    #[test]
    fn test_template_round_trips() {
        let template = RenderCloudConfig::template();
        let text = template.to_toml().unwrap();
        assert!(text.contains("[api]"));
        assert!(!text.contains("api_key"));
        assert_eq!(RenderCloudConfig::from_toml(&text).unwrap(), template);
    }
}
