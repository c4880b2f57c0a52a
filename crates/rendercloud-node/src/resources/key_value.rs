//! Key Value (Redis-compatible) resource.

use rendercloud_client::api::KeyValueFilters;
use rendercloud_client::{CreateKeyValueRequest, RenderClient, UpdateKeyValueRequest};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{
    FieldOption, FieldSpec, ResourceDescriptor, limit, op, opt, plan_options, region_options,
    return_all,
};

operations!("keyValue" {
    Create => "create",
    Delete => "delete",
    Get => "get",
    GetConnectionInfo => "getConnectionInfo",
    List => "list",
    Resume => "resume",
    Suspend => "suspend",
    Update => "update",
});

fn maxmemory_policy_options() -> Vec<FieldOption> {
    vec![
        opt("No Eviction", "noeviction"),
        opt("All Keys LRU", "allkeys-lru"),
        opt("All Keys LFU", "allkeys-lfu"),
        opt("All Keys Random", "allkeys-random"),
        opt("Volatile LRU", "volatile-lru"),
        opt("Volatile LFU", "volatile-lfu"),
        opt("Volatile Random", "volatile-random"),
        opt("Volatile TTL", "volatile-ttl"),
    ]
}

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::KeyValue,
        display_name: "Key Value (Redis)",
        description: "Manage Redis/Key Value instances",
        default_operation: "list",
        operations: vec![
            op("create", "Create", "Create a new Key Value instance", "Create a Key Value instance"),
            op("delete", "Delete", "Delete a Key Value instance", "Delete a Key Value instance"),
            op("get", "Get", "Retrieve Key Value instance details", "Get a Key Value instance"),
            op("getConnectionInfo", "Get Connection Info", "Get connection string and credentials", "Get connection info for a Key Value instance"),
            op("list", "List", "List Key Value instances", "List Key Value instances"),
            op("resume", "Resume", "Resume a suspended Key Value instance", "Resume a Key Value instance"),
            op("suspend", "Suspend", "Suspend a Key Value instance", "Suspend a Key Value instance"),
            op("update", "Update", "Update Key Value configuration", "Update a Key Value instance"),
        ],
        fields: vec![
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::string("ownerId", "Owner ID").description("Filter by workspace owner ID"),
                    FieldSpec::string("name", "Name").description("Filter by instance name"),
                    FieldSpec::options("region", "Region", region_options())
                        .default("oregon")
                        .description("Filter by region"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("keyValueId", "Key Value ID")
                .required()
                .description("The ID of the Key Value instance (red-xxxxx format)")
                .show_for(&["get", "update", "delete", "getConnectionInfo", "suspend", "resume"]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the Key Value instance")
                .show_for(&["create"]),
            FieldSpec::string("ownerId", "Owner ID")
                .required()
                .description("The ID of the owner (user or team)")
                .show_for(&["create"]),
            FieldSpec::collection(
                "additionalOptions",
                "Additional Options",
                vec![
                    FieldSpec::options("maxmemoryPolicy", "Maxmemory Policy", maxmemory_policy_options())
                        .description("Redis maxmemory-policy setting"),
                    FieldSpec::options("plan", "Plan", plan_options(true))
                        .default("starter")
                        .description("Instance plan"),
                    FieldSpec::options("region", "Region", region_options())
                        .default("oregon")
                        .description("Deployment region"),
                ],
            )
            .show_for(&["create"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::options("maxmemoryPolicy", "Maxmemory Policy", maxmemory_policy_options())
                        .description("Redis maxmemory-policy setting"),
                    FieldSpec::string("name", "Name").description("The name of the Key Value instance"),
                    FieldSpec::options("plan", "Plan", plan_options(false)).description("Instance plan"),
                ],
            )
            .show_for(&["update"]),
        ],
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let key_value = client.key_value();
    let id = || params.string("keyValueId");
    match operation {
        Operation::List => {
            let f = params.collection("filters");
            let filters = KeyValueFilters {
                owner_id: f.optional_string("ownerId"),
                name: f.optional_string("name"),
                region: f.optional_string("region"),
            };
            Ok(list(key_value.list(&filters, params.list_mode(20)?).await?))
        }
        Operation::Get => Ok(key_value.get(&id()?).await?),
        Operation::Create => {
            let options = params.collection("additionalOptions");
            let request = CreateKeyValueRequest {
                name: params.string("name")?,
                owner_id: params.string("ownerId")?,
                maxmemory_policy: options.optional_string("maxmemoryPolicy"),
                plan: options.optional_string("plan"),
                region: options.optional_string("region"),
            };
            Ok(key_value.create(&request).await?)
        }
        Operation::Update => {
            let id = id()?;
            let fields = params.collection("updateFields");
            let request = UpdateKeyValueRequest {
                name: fields.optional_string("name"),
                plan: fields.optional_string("plan"),
                maxmemory_policy: fields.optional_string("maxmemoryPolicy"),
            };
            Ok(key_value.update(&id, &request).await?)
        }
        Operation::Delete => {
            let id = id()?;
            key_value.delete(&id).await?;
            Ok(success("keyValueId", &id))
        }
        Operation::GetConnectionInfo => Ok(key_value.connection_info(&id()?).await?),
        Operation::Suspend => Ok(key_value.suspend(&id()?).await?),
        Operation::Resume => Ok(key_value.resume(&id()?).await?),
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
