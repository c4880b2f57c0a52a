//! Deploy resource.

use rendercloud_client::api::DeployFilters;
use rendercloud_client::{RenderClient, TriggerDeployRequest};
use serde_json::Value;

use crate::error::Result;
use crate::node::list;
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, return_all};

operations!("deploy" {
    Cancel => "cancel",
    Get => "get",
    List => "list",
    Rollback => "rollback",
    Trigger => "trigger",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Deploy,
        display_name: "Deploy",
        description: "Trigger and manage service deployments",
        default_operation: "list",
        operations: vec![
            op("cancel", "Cancel", "Cancel an in-progress deploy", "Cancel a deploy"),
            op("get", "Get", "Retrieve deploy details", "Get a deploy"),
            op("list", "List", "List deploys for a service", "List deploys"),
            op("rollback", "Rollback", "Roll back to a previous deploy", "Rollback a deploy"),
            op("trigger", "Trigger", "Trigger a new deploy", "Trigger a deploy"),
        ],
        fields: vec![
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service (srv-xxxxx format)"),
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::date_time("startTime", "Start Time")
                        .description("Filter deploys after this time"),
                    FieldSpec::date_time("endTime", "End Time")
                        .description("Filter deploys before this time"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("deployId", "Deploy ID")
                .required()
                .description("The ID of the deploy (dep-xxxxx format)")
                .show_for(&["get", "cancel", "rollback"]),
            FieldSpec::collection(
                "options",
                "Options",
                vec![
                    FieldSpec::boolean("clearCache", "Clear Cache")
                        .description("Whether to clear the build cache before deploying"),
                    FieldSpec::string("commitId", "Commit ID")
                        .description("Specific Git commit to deploy"),
                    FieldSpec::string("imageUrl", "Image URL")
                        .description("Docker image URL for image-backed services"),
                ],
            )
            .show_for(&["trigger"]),
        ],
    }
}

fn trigger_request(params: &Parameters) -> TriggerDeployRequest {
    let options = params.collection("options");
    TriggerDeployRequest {
        clear_cache: options
            .bool_or("clearCache", false)
            .then(|| "clear".to_string()),
        commit_id: options.optional_string("commitId"),
        image_url: options.optional_string("imageUrl"),
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let deploys = client.deploys();
    let service_id = params.string("serviceId")?;
    match operation {
        Operation::List => {
            let f = params.collection("filters");
            let filters = DeployFilters {
                start_time: f.optional_string("startTime"),
                end_time: f.optional_string("endTime"),
            };
            let mode = params.list_mode(20)?;
            Ok(list(deploys.list(&service_id, &filters, mode).await?))
        }
        Operation::Get => Ok(deploys.get(&service_id, &params.string("deployId")?).await?),
        Operation::Trigger => Ok(deploys.trigger(&service_id, &trigger_request(params)).await?),
        Operation::Cancel => Ok(deploys.cancel(&service_id, &params.string("deployId")?).await?),
        Operation::Rollback => {
            Ok(deploys.rollback(&service_id, &params.string("deployId")?).await?)
        }
    }
}
