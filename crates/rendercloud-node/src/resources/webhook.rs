//! Webhook subscription resource.

use rendercloud_client::api::WebhookEventFilters;
use rendercloud_client::{CreateWebhookRequest, RenderClient, UpdateWebhookRequest, split_ids};
use serde_json::Value;

use crate::error::{NodeError, Result};
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::{Resource, event_options};
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, opt, return_all};

operations!("webhook" {
    Create => "create",
    Delete => "delete",
    Get => "get",
    List => "list",
    ListEvents => "listEvents",
    Update => "update",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Webhook,
        display_name: "Webhook",
        description: "Manage webhooks for event notifications",
        default_operation: "list",
        operations: vec![
            op("create", "Create", "Create a new webhook", "Create a webhook"),
            op("delete", "Delete", "Delete a webhook", "Delete a webhook"),
            op("get", "Get", "Get a webhook by ID", "Get a webhook"),
            op("list", "List", "List all webhooks for a workspace", "List webhooks"),
            op("listEvents", "List Events", "List events delivered to a webhook", "List webhook events"),
            op("update", "Update", "Update webhook configuration", "Update a webhook"),
        ],
        fields: vec![
            FieldSpec::string("ownerId", "Owner ID")
                .required()
                .description("The ID of the workspace owner (usr-xxxxx or tea-xxxxx)")
                .show_for(&["list", "create"]),
            return_all(&["list", "listEvents"]),
            limit(&["list", "listEvents"], 50),
            FieldSpec::string("url", "Webhook URL")
                .required()
                .description("The URL to send webhook events to")
                .show_for(&["create"]),
            FieldSpec::multi_options("events", "Events", event_options())
                .required()
                .description("The event types to subscribe to")
                .show_for(&["create"]),
            FieldSpec::collection(
                "additionalFields",
                "Additional Fields",
                vec![
                    FieldSpec::string("secret", "Secret")
                        .description("Secret used to sign webhook payloads for verification"),
                    FieldSpec::string("serviceIds", "Service IDs").description(
                        "Comma-separated list of service IDs to filter events by (e.g., srv-xxxxx,srv-yyyyy)",
                    ),
                ],
            )
            .show_for(&["create"]),
            FieldSpec::string("webhookId", "Webhook ID")
                .required()
                .description("The ID of the webhook")
                .show_for(&["get", "delete", "update", "listEvents"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::multi_options("events", "Events", event_options())
                        .description("The event types to subscribe to"),
                    FieldSpec::string("secret", "Secret")
                        .description("Secret used to sign webhook payloads for verification"),
                    FieldSpec::string("serviceIds", "Service IDs")
                        .description("Comma-separated list of service IDs to filter events by"),
                    FieldSpec::string("url", "URL").description("The URL to send webhook events to"),
                ],
            )
            .show_for(&["update"]),
            FieldSpec::collection(
                "eventFilters",
                "Event Filters",
                vec![FieldSpec::options(
                    "status",
                    "Status",
                    vec![
                        opt("All", ""),
                        opt("Delivered", "delivered"),
                        opt("Failed", "failed"),
                        opt("Pending", "pending"),
                    ],
                )
                .description("Filter events by delivery status")],
            )
            .show_for(&["listEvents"]),
        ],
    }
}

fn service_ids(fields: &Parameters) -> Option<Vec<String>> {
    fields
        .optional_string("serviceIds")
        .map(|ids| split_ids(&ids))
        .filter(|ids| !ids.is_empty())
}

fn create_request(params: &Parameters) -> Result<CreateWebhookRequest> {
    let events = params.string_list("events");
    if events.is_empty() {
        return Err(NodeError::MissingParameter("events".to_string()));
    }
    let extra = params.collection("additionalFields");
    Ok(CreateWebhookRequest {
        owner_id: params.string("ownerId")?,
        url: params.string("url")?,
        events,
        secret: extra.optional_string("secret"),
        service_ids: service_ids(&extra),
    })
}

fn update_request(params: &Parameters) -> UpdateWebhookRequest {
    let fields = params.collection("updateFields");
    let events = fields.string_list("events");
    UpdateWebhookRequest {
        url: fields.optional_string("url"),
        secret: fields.optional_string("secret"),
        events: (!events.is_empty()).then_some(events),
        service_ids: service_ids(&fields),
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let webhooks = client.webhooks();
    match operation {
        Operation::List => {
            let owner_id = params.string("ownerId")?;
            Ok(list(webhooks.list(&owner_id, params.list_mode(50)?).await?))
        }
        Operation::Create => Ok(webhooks.create(&create_request(params)?).await?),
        Operation::Get => Ok(webhooks.get(&params.string("webhookId")?).await?),
        Operation::Update => {
            let id = params.string("webhookId")?;
            Ok(webhooks.update(&id, &update_request(params)).await?)
        }
        Operation::Delete => {
            let id = params.string("webhookId")?;
            webhooks.delete(&id).await?;
            Ok(success("webhookId", &id))
        }
        Operation::ListEvents => {
            let id = params.string("webhookId")?;
            let filters = WebhookEventFilters {
                status: params.collection("eventFilters").optional_string("status"),
            };
            Ok(list(webhooks.list_events(&id, &filters, params.list_mode(50)?).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operations_match_descriptor() {
        assert_operations_match_descriptor!();
    }

    #[test]
    fn test_create_request_splits_service_ids() {
        let params = Parameters::from_value(json!({
            "ownerId": "tea-1",
            "url": "https://example.com/hook",
            "events": ["deploy_succeeded"],
            "additionalFields": {"serviceIds": "srv-1, srv-2,", "secret": ""},
        }))
        .unwrap();
        let body = serde_json::to_value(create_request(&params).unwrap()).unwrap();
        assert_eq!(body["serviceIds"], json!(["srv-1", "srv-2"]));
        assert!(body.get("secret").is_none());
    }

    #[test]
    fn test_create_request_needs_events() {
        let params = Parameters::from_value(json!({
            "ownerId": "tea-1",
            "url": "https://example.com/hook",
            "events": [],
        }))
        .unwrap();
        assert!(matches!(
            create_request(&params),
            Err(NodeError::MissingParameter(name)) if name == "events"
        ));
    }

    #[test]
    fn test_update_request_drops_empty_events() {
        let params = Parameters::from_value(json!({"updateFields": {"events": [], "url": "https://x"}})).unwrap();
        let body = serde_json::to_value(update_request(&params)).unwrap();
        assert_eq!(body, json!({"url": "https://x"}));
    }
}
