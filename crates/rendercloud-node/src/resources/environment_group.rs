//! Environment group resource: shared variables and secret files.

use rendercloud_client::api::EnvGroupFilters;
use rendercloud_client::{CreateEnvGroupRequest, RenderClient, UpdateEnvGroupRequest};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::resources::environment_variable::env_var_input;
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, return_all};

operations!("environmentGroup" {
    Create => "create",
    Delete => "delete",
    DeleteEnvVar => "deleteEnvVar",
    DeleteSecretFile => "deleteSecretFile",
    Get => "get",
    GetEnvVar => "getEnvVar",
    GetSecretFile => "getSecretFile",
    LinkService => "linkService",
    List => "list",
    UnlinkService => "unlinkService",
    Update => "update",
    UpdateEnvVar => "updateEnvVar",
    UpdateSecretFile => "updateSecretFile",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::EnvironmentGroup,
        display_name: "Environment Group",
        description: "Manage shared environment variables and secrets",
        default_operation: "list",
        operations: vec![
            op("create", "Create", "Create a new environment group", "Create an environment group"),
            op("delete", "Delete", "Delete an environment group", "Delete an environment group"),
            op("deleteEnvVar", "Delete Env Var", "Remove an environment variable from the group", "Delete an env var from an environment group"),
            op("deleteSecretFile", "Delete Secret File", "Remove a secret file from the group", "Delete a secret file from an environment group"),
            op("get", "Get", "Retrieve environment group details", "Get an environment group"),
            op("getEnvVar", "Get Env Var", "Get a specific environment variable", "Get an env var from an environment group"),
            op("getSecretFile", "Get Secret File", "Get a specific secret file", "Get a secret file from an environment group"),
            op("linkService", "Link Service", "Link a service to the environment group", "Link a service to an environment group"),
            op("list", "List", "List environment groups", "List environment groups"),
            op("unlinkService", "Unlink Service", "Unlink a service from the environment group", "Unlink a service from an environment group"),
            op("update", "Update", "Update environment group", "Update an environment group"),
            op("updateEnvVar", "Update Env Var", "Add or update an environment variable", "Update an env var in an environment group"),
            op("updateSecretFile", "Update Secret File", "Add or update a secret file", "Update a secret file in an environment group"),
        ],
        fields: vec![
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::string("ownerId", "Owner ID").description("Filter by workspace owner ID"),
                    FieldSpec::string("name", "Name").description("Filter by group name"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("envGroupId", "Environment Group ID")
                .required()
                .description("The ID of the environment group (evg-xxxxx format)")
                .show_for(&[
                    "get",
                    "update",
                    "delete",
                    "linkService",
                    "unlinkService",
                    "getEnvVar",
                    "updateEnvVar",
                    "deleteEnvVar",
                    "getSecretFile",
                    "updateSecretFile",
                    "deleteSecretFile",
                ]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the environment group")
                .show_for(&["create"]),
            FieldSpec::string("ownerId", "Owner ID")
                .required()
                .description("The ID of the owner (user or team)")
                .show_for(&["create"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![FieldSpec::string("name", "Name").description("The name of the environment group")],
            )
            .show_for(&["update"]),
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service to link/unlink")
                .show_for(&["linkService", "unlinkService"]),
            FieldSpec::string("envVarKey", "Environment Variable Key")
                .required()
                .description("The key of the environment variable")
                .show_for(&["getEnvVar", "deleteEnvVar"]),
            FieldSpec::string("key", "Key")
                .required()
                .description("The key of the environment variable")
                .show_for(&["updateEnvVar"]),
            FieldSpec::string("value", "Value")
                .description("The value of the environment variable")
                .show_for(&["updateEnvVar"]),
            FieldSpec::boolean("generateValue", "Generate Value")
                .description("Whether to auto-generate a secure value")
                .show_for(&["updateEnvVar"]),
            FieldSpec::string("secretFileName", "Secret File Name")
                .required()
                .description("The name/path of the secret file")
                .show_for(&["getSecretFile", "deleteSecretFile"]),
            FieldSpec::string("fileName", "File Name")
                .required()
                .description("The name/path of the secret file")
                .show_for(&["updateSecretFile"]),
            FieldSpec::string("contents", "Contents")
                .required()
                .description("The contents of the secret file")
                .show_for(&["updateSecretFile"]),
        ],
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let groups = client.env_groups();
    let id = || params.string("envGroupId");
    match operation {
        Operation::List => {
            let f = params.collection("filters");
            let filters = EnvGroupFilters {
                owner_id: f.optional_string("ownerId"),
                name: f.optional_string("name"),
            };
            Ok(list(groups.list(&filters, params.list_mode(20)?).await?))
        }
        Operation::Get => Ok(groups.get(&id()?).await?),
        Operation::Create => {
            let request = CreateEnvGroupRequest {
                name: params.string("name")?,
                owner_id: params.string("ownerId")?,
            };
            Ok(groups.create(&request).await?)
        }
        Operation::Update => {
            let id = id()?;
            let request = UpdateEnvGroupRequest {
                name: params.collection("updateFields").optional_string("name"),
            };
            Ok(groups.update(&id, &request).await?)
        }
        Operation::Delete => {
            let id = id()?;
            groups.delete(&id).await?;
            Ok(success("envGroupId", &id))
        }
        Operation::LinkService => {
            let id = id()?;
            Ok(groups.link_service(&id, &params.string("serviceId")?).await?)
        }
        Operation::UnlinkService => {
            let id = id()?;
            Ok(groups.unlink_service(&id, &params.string("serviceId")?).await?)
        }
        Operation::GetEnvVar => {
            let id = id()?;
            Ok(groups.get_env_var(&id, &params.string("envVarKey")?).await?)
        }
        Operation::UpdateEnvVar => {
            let id = id()?;
            Ok(groups.set_env_var(&id, &env_var_input(params)?).await?)
        }
        Operation::DeleteEnvVar => {
            let id = id()?;
            let key = params.string("envVarKey")?;
            groups.delete_env_var(&id, &key).await?;
            Ok(success("envVarKey", &key))
        }
        Operation::GetSecretFile => {
            let id = id()?;
            Ok(groups.get_secret_file(&id, &params.string("secretFileName")?).await?)
        }
        Operation::UpdateSecretFile => {
            let id = id()?;
            let name = params.string("fileName")?;
            let contents = params.string("contents")?;
            Ok(groups.set_secret_file(&id, &name, &contents).await?)
        }
        Operation::DeleteSecretFile => {
            let id = id()?;
            let name = params.string("secretFileName")?;
            groups.delete_secret_file(&id, &name).await?;
            Ok(success("secretFileName", &name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_match_descriptor() {
        assert_operations_match_descriptor!();
    }
}
