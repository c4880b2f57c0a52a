//! Webhooks API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{CreateWebhookRequest, UpdateWebhookRequest};

/// Filters for listing webhook delivery events.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct WebhookEventFilters {
    /// `delivered`, `failed` or `pending`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Webhook subscriptions. Webhook ids carry no fixed prefix.
pub struct WebhooksApi {
    client: RenderClient,
}

impl WebhooksApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    /// List subscriptions of an owner.
    pub async fn list(&self, owner_id: &str, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get("/webhooks").query_param("ownerId", owner_id);
        self.client.list(req, "webhook", mode).await
    }

    pub async fn get(&self, webhook_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(format!("/webhooks/{}", encode_segment(webhook_id))))
            .await
    }

    pub async fn create(&self, request: &CreateWebhookRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post("/webhooks").json_body(request)?)
            .await
    }

    pub async fn update(&self, webhook_id: &str, request: &UpdateWebhookRequest) -> Result<Value> {
        self.client
            .request(
                ApiRequest::patch(format!("/webhooks/{}", encode_segment(webhook_id)))
                    .json_body(request)?,
            )
            .await
    }

    pub async fn delete(&self, webhook_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::delete(format!("/webhooks/{}", encode_segment(webhook_id))))
            .await?;
        Ok(())
    }

    /// Delivery history of a subscription.
    pub async fn list_events(
        &self,
        webhook_id: &str,
        filters: &WebhookEventFilters,
        mode: ListMode,
    ) -> Result<Vec<Value>> {
        let path = format!("/webhooks/{}/events", encode_segment(webhook_id));
        let req = ApiRequest::get(path).query_from(filters)?;
        self.client.list(req, "event", mode).await
    }
}
