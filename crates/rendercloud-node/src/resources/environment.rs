//! Project environment resource.

use rendercloud_client::{
    CreateEnvironmentRequest, ProtectedStatus, RenderClient, UpdateEnvironmentRequest,
};
use serde_json::Value;

use crate::error::{NodeError, Result};
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, return_all};

operations!("environment" {
    AddResources => "addResources",
    Create => "create",
    Delete => "delete",
    Get => "get",
    List => "list",
    RemoveResources => "removeResources",
    Update => "update",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Environment,
        display_name: "Environment",
        description: "Manage environments within projects",
        default_operation: "list",
        operations: vec![
            op("addResources", "Add Resources", "Add services/databases to an environment", "Add resources to an environment"),
            op("create", "Create", "Create a new environment", "Create an environment"),
            op("delete", "Delete", "Delete an environment", "Delete an environment"),
            op("get", "Get", "Retrieve environment details", "Get an environment"),
            op("list", "List", "List environments within a project", "List environments"),
            op("removeResources", "Remove Resources", "Remove resources from an environment", "Remove resources from an environment"),
            op("update", "Update", "Update environment configuration", "Update an environment"),
        ],
        fields: vec![
            FieldSpec::string("projectId", "Project ID")
                .required()
                .description("The ID of the project (prj-xxxxx format)"),
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::string("environmentId", "Environment ID")
                .required()
                .description("The ID of the environment (env-xxxxx format)")
                .show_for(&["get", "delete", "update", "addResources", "removeResources"]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the environment")
                .show_for(&["create"]),
            FieldSpec::collection(
                "additionalOptions",
                "Additional Options",
                vec![FieldSpec::boolean("protectedStatus", "Protected Status")
                    .description("Whether to mark the environment as protected")],
            )
            .show_for(&["create"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::string("name", "Name").description("The name of the environment"),
                    FieldSpec::boolean("protectedStatus", "Protected Status")
                        .description("Whether to mark the environment as protected"),
                ],
            )
            .show_for(&["update"]),
            FieldSpec::string("resourceIds", "Resource IDs")
                .required()
                .description("Comma-separated list of service/database IDs to add or remove")
                .show_for(&["addResources", "removeResources"]),
        ],
    }
}

fn resource_ids(params: &Parameters) -> Result<Vec<String>> {
    let ids = params.string_list("resourceIds");
    if ids.is_empty() {
        return Err(NodeError::MissingParameter("resourceIds".to_string()));
    }
    Ok(ids)
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let environments = client.environments();
    let project_id = params.string("projectId")?;
    match operation {
        Operation::List => {
            Ok(list(environments.list(&project_id, params.list_mode(20)?).await?))
        }
        Operation::Get => {
            Ok(environments.get(&project_id, &params.string("environmentId")?).await?)
        }
        Operation::Create => {
            let request = CreateEnvironmentRequest {
                name: params.string("name")?,
                protected_status: params
                    .collection("additionalOptions")
                    .optional_bool("protectedStatus")
                    .map(ProtectedStatus::from),
            };
            Ok(environments.create(&project_id, &request).await?)
        }
        Operation::Update => {
            let id = params.string("environmentId")?;
            let fields = params.collection("updateFields");
            let request = UpdateEnvironmentRequest {
                name: fields.optional_string("name"),
                protected_status: fields.optional_bool("protectedStatus").map(ProtectedStatus::from),
            };
            Ok(environments.update(&project_id, &id, &request).await?)
        }
        Operation::Delete => {
            let id = params.string("environmentId")?;
            environments.delete(&project_id, &id).await?;
            Ok(success("environmentId", &id))
        }
        Operation::AddResources => {
            let id = params.string("environmentId")?;
            Ok(environments.add_resources(&project_id, &id, resource_ids(params)?).await?)
        }
        Operation::RemoveResources => {
            let id = params.string("environmentId")?;
            Ok(environments.remove_resources(&project_id, &id, resource_ids(params)?).await?)
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
    fn test_resource_ids_split_and_required() {
        let params = Parameters::from_value(json!({"resourceIds": "srv-1, dpg-2"})).unwrap();
        assert_eq!(resource_ids(&params).unwrap(), vec!["srv-1", "dpg-2"]);

        let params = Parameters::from_value(json!({"resourceIds": " , "})).unwrap();
        assert!(matches!(resource_ids(&params), Err(NodeError::MissingParameter(_))));
    }
}
