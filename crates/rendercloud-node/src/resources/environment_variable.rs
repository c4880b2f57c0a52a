//! Service environment variable resource.

use rendercloud_client::{EnvVarInput, RenderClient};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, op};

operations!("environmentVariable" {
    AddOrUpdate => "addOrUpdate",
    Delete => "delete",
    Get => "get",
    List => "list",
    UpdateAll => "updateAll",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::EnvironmentVariable,
        display_name: "Environment Variable",
        description: "Manage environment variables for services",
        default_operation: "list",
        operations: vec![
            op("addOrUpdate", "Add or Update", "Add or update a single environment variable", "Add or update an environment variable"),
            op("delete", "Delete", "Delete an environment variable", "Delete an environment variable"),
            op("get", "Get", "Retrieve a specific environment variable", "Get an environment variable"),
            op("list", "List", "List environment variables for a service", "List environment variables"),
            op("updateAll", "Update All", "Update all environment variables (replace)", "Update all environment variables"),
        ],
        fields: vec![
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service (srv-xxxxx format)"),
            FieldSpec::string("envVarKey", "Environment Variable Key")
                .required()
                .description("The key of the environment variable")
                .show_for(&["get", "delete"]),
            FieldSpec::string("key", "Key")
                .required()
                .description("The key of the environment variable")
                .show_for(&["addOrUpdate"]),
            FieldSpec::string("value", "Value")
                .description("The value of the environment variable")
                .show_for(&["addOrUpdate"]),
            FieldSpec::boolean("generateValue", "Generate Value")
                .description("Whether to auto-generate a secure value (overrides the value field)")
                .show_for(&["addOrUpdate"]),
            FieldSpec::fixed_collection(
                "envVars",
                "Environment Variables",
                "envVarValues",
                vec![
                    FieldSpec::string("key", "Key"),
                    FieldSpec::string("value", "Value"),
                    FieldSpec::boolean("generateValue", "Generate Value"),
                ],
            )
            .description("Environment variables to set (replaces all existing)")
            .show_for(&["updateAll"]),
        ],
    }
}

/// Build one variable from a `key` / `value` / `generateValue` triple.
pub(crate) fn env_var_input(params: &Parameters) -> Result<EnvVarInput> {
    let key = params.string("key")?;
    if params.bool_or("generateValue", false) {
        Ok(EnvVarInput::generated(key))
    } else {
        Ok(EnvVarInput::value(key, params.string_or("value", "")))
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let env_vars = client.env_vars();
    let service_id = params.string("serviceId")?;
    match operation {
        Operation::List => Ok(list(env_vars.list(&service_id).await?)),
        Operation::Get => Ok(env_vars.get(&service_id, &params.string("envVarKey")?).await?),
        Operation::AddOrUpdate => Ok(env_vars.set(&service_id, &env_var_input(params)?).await?),
        Operation::Delete => {
            let key = params.string("envVarKey")?;
            env_vars.delete(&service_id, &key).await?;
            Ok(success("envVarKey", &key))
        }
        Operation::UpdateAll => {
            let vars = params
                .entries("envVars", "envVarValues")
                .iter()
                .map(env_var_input)
                .collect::<Result<Vec<_>>>()?;
            Ok(env_vars.replace_all(&service_id, vars).await?)
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
    fn test_env_var_input_prefers_generation() {
        let params = Parameters::from_value(json!({"key": "SECRET", "value": "x", "generateValue": true})).unwrap();
        assert_eq!(env_var_input(&params).unwrap(), EnvVarInput::generated("SECRET"));

        let params = Parameters::from_value(json!({"key": "PORT", "value": "8080"})).unwrap();
        assert_eq!(env_var_input(&params).unwrap(), EnvVarInput::value("PORT", "8080"));

        let params = Parameters::from_value(json!({"key": "EMPTY"})).unwrap();
        assert_eq!(env_var_input(&params).unwrap(), EnvVarInput::value("EMPTY", ""));
    }

    #[test]
    fn test_env_var_input_requires_key() {
        assert!(env_var_input(&Parameters::new()).is_err());
    }
}
