//! Subscription lifecycle: check, create and delete the Render webhook that
//! feeds a trigger.

use std::sync::Arc;

use rand::RngCore;
use rendercloud_client::{CreateWebhookRequest, RenderClient};
use rendercloud_config::WebhookConfig;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, WebhookError};
use crate::events::WebhookEventType;
use crate::store::{StateStore, SubscriptionState};

/// Random bytes in a generated secret (hex encoded to twice as many chars).
pub const GENERATED_SECRET_BYTES: usize = 32;

/// What a trigger subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSettings {
    /// Workspace owning the subscription (`usr-` or `tea-`).
    pub owner_id: String,
    pub events: Vec<WebhookEventType>,
    /// Restrict to these services. Empty means all services.
    pub service_ids: Vec<String>,
    /// Secret to register. Generated when unset or empty.
    pub webhook_secret: Option<String>,
    pub verify_signature: bool,
}

impl TriggerSettings {
    pub fn new(owner_id: impl Into<String>, events: Vec<WebhookEventType>) -> Self {
        Self {
            owner_id: owner_id.into(),
            events,
            service_ids: Vec::new(),
            webhook_secret: None,
            verify_signature: true,
        }
    }

    pub fn with_service_ids(mut self, ids: Vec<String>) -> Self {
        self.service_ids = ids;
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    pub fn with_verify_signature(mut self, verify: bool) -> Self {
        self.verify_signature = verify;
        self
    }

    /// Build from the `[webhook]` config section.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        let owner_id = config
            .owner_id
            .clone()
            .filter(|o| !o.trim().is_empty())
            .ok_or_else(|| WebhookError::InvalidSettings("webhook.owner_id is required".into()))?;
        let events = WebhookEventType::parse_list(&config.events)?;

        Ok(Self {
            owner_id,
            events,
            service_ids: config
                .service_ids
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            webhook_secret: config.secret.clone(),
            verify_signature: config.verify_signature,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(WebhookError::InvalidSettings("owner id is required".into()));
        }
        if self.events.is_empty() {
            return Err(WebhookError::InvalidSettings(
                "at least one event is required".into(),
            ));
        }
        Ok(())
    }
}

/// Generate a subscription secret: 32 random bytes, lowercase hex.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A trigger's subscription, tied to its slot in a [`StateStore`].
#[derive(Clone)]
pub struct Subscription {
    client: RenderClient,
    store: Arc<dyn StateStore>,
    key: String,
    settings: TriggerSettings,
}

impl Subscription {
    pub fn new(
        client: RenderClient,
        store: Arc<dyn StateStore>,
        key: impl Into<String>,
        settings: TriggerSettings,
    ) -> Self {
        Self {
            client,
            store,
            key: key.into(),
            settings,
        }
    }

    pub fn settings(&self) -> &TriggerSettings {
        &self.settings
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn state(&self) -> Result<SubscriptionState> {
        self.store.load(&self.key).await
    }

    /// Whether the stored subscription still exists and points at
    /// `callback_url`. Any failure counts as "does not exist".
    pub async fn check_exists(&self, callback_url: &str) -> bool {
        let state = match self.store.load(&self.key).await {
            Ok(state) => state,
            Err(e) => {
                warn!(key = %self.key, error = %e, "could not load subscription state");
                return false;
            }
        };
        let Some(webhook_id) = state.webhook_id else {
            return false;
        };

        match self.client.webhooks().get(&webhook_id).await {
            Ok(webhook) => {
                let url = webhook.get("url").and_then(Value::as_str);
                let matches = url == Some(callback_url);
                debug!(%webhook_id, ?url, matches, "checked subscription");
                matches
            }
            Err(e) => {
                debug!(%webhook_id, error = %e, "subscription lookup failed");
                false
            }
        }
    }

    /// Register a subscription delivering to `callback_url`.
    ///
    /// Returns `Ok(false)` when Render answers without an id, in which case
    /// nothing is stored.
    pub async fn create(&self, callback_url: &str) -> Result<bool> {
        self.settings.validate()?;

        let secret = self
            .settings
            .webhook_secret
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(generate_secret);

        let request = CreateWebhookRequest {
            owner_id: self.settings.owner_id.clone(),
            url: callback_url.to_string(),
            events: self
                .settings
                .events
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
            secret: Some(secret.clone()),
            service_ids: (!self.settings.service_ids.is_empty())
                .then(|| self.settings.service_ids.clone()),
        };

        let response = self
            .client
            .webhooks()
            .create(&request)
            .await
            .map_err(|e| WebhookError::CreateFailed(e.to_string()))?;

        let Some(webhook_id) = response.get("id").and_then(Value::as_str) else {
            warn!("Render accepted the webhook but returned no id");
            return Ok(false);
        };

        self.store
            .save(
                &self.key,
                &SubscriptionState {
                    webhook_id: Some(webhook_id.to_string()),
                    webhook_secret: Some(secret),
                },
            )
            .await?;
        info!(%webhook_id, url = %callback_url, "webhook subscription created");
        Ok(true)
    }

    /// Remove the subscription. The remote delete is best effort; local
    /// state is always cleared.
    pub async fn delete(&self) -> Result<bool> {
        let state = self.store.load(&self.key).await?;
        let Some(webhook_id) = state.webhook_id else {
            return Ok(true);
        };

        match self.client.webhooks().delete(&webhook_id).await {
            Ok(()) => info!(%webhook_id, "webhook subscription deleted"),
            Err(e) => warn!(%webhook_id, error = %e, "Failed to delete webhook"),
        }

        self.store.clear(&self.key).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secret_shape() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_config() {
        let config = WebhookConfig {
            owner_id: Some("tea-1".to_string()),
            events: vec!["deploy_failed".to_string()],
            service_ids: vec![" srv-1 ".to_string(), "".to_string()],
            secret: Some("abc".to_string()),
            verify_signature: false,
            ..Default::default()
        };
        let settings = TriggerSettings::from_config(&config).unwrap();
        assert_eq!(settings.owner_id, "tea-1");
        assert_eq!(settings.events, vec![WebhookEventType::DeployFailed]);
        assert_eq!(settings.service_ids, vec!["srv-1"]);
        assert_eq!(settings.webhook_secret.as_deref(), Some("abc"));
        assert!(!settings.verify_signature);
    }

    #[test]
    fn test_from_config_requires_owner() {
        let config = WebhookConfig::default();
        assert!(matches!(
            TriggerSettings::from_config(&config),
            Err(WebhookError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_validate_requires_events() {
        let settings = TriggerSettings::new("tea-1", vec![]);
        assert!(settings.validate().is_err());
    }
}
