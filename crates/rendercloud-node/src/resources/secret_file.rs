//! Service secret file resource.

use rendercloud_client::{RenderClient, SecretFileInput};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, op};

operations!("secretFile" {
    AddOrUpdate => "addOrUpdate",
    Delete => "delete",
    Get => "get",
    List => "list",
    UpdateAll => "updateAll",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::SecretFile,
        display_name: "Secret File",
        description: "Manage secret files for services",
        default_operation: "list",
        operations: vec![
            op("addOrUpdate", "Add or Update", "Add or update a single secret file", "Add or update a secret file"),
            op("delete", "Delete", "Delete a secret file", "Delete a secret file"),
            op("get", "Get", "Retrieve a specific secret file", "Get a secret file"),
            op("list", "List", "List secret files for a service", "List secret files"),
            op("updateAll", "Update All", "Update all secret files (replace)", "Update all secret files"),
        ],
        fields: vec![
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service (srv-xxxxx format)"),
            FieldSpec::string("secretFileName", "Secret File Name")
                .required()
                .description("The name/path of the secret file")
                .show_for(&["get", "delete"]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name/path of the secret file")
                .show_for(&["addOrUpdate"]),
            FieldSpec::string("contents", "Contents")
                .required()
                .description("The contents of the secret file (will be Base64 encoded)")
                .show_for(&["addOrUpdate"]),
            FieldSpec::fixed_collection(
                "secretFiles",
                "Secret Files",
                "secretFileValues",
                vec![
                    FieldSpec::string("name", "Name"),
                    FieldSpec::string("contents", "Contents"),
                ],
            )
            .description("Secret files to set (replaces all existing)")
            .show_for(&["updateAll"]),
        ],
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let files = client.secret_files();
    let service_id = params.string("serviceId")?;
    match operation {
        Operation::List => Ok(list(files.list(&service_id).await?)),
        Operation::Get => Ok(files.get(&service_id, &params.string("secretFileName")?).await?),
        Operation::AddOrUpdate => {
            let name = params.string("name")?;
            let contents = params.string("contents")?;
            Ok(files.set(&service_id, &name, &contents).await?)
        }
        Operation::Delete => {
            let name = params.string("secretFileName")?;
            files.delete(&service_id, &name).await?;
            Ok(success("secretFileName", &name))
        }
        Operation::UpdateAll => {
            let inputs = params
                .entries("secretFiles", "secretFileValues")
                .iter()
                .map(|row| -> Result<SecretFileInput> {
                    Ok(SecretFileInput::from_plain(
                        row.string("name")?,
                        &row.string_or("contents", ""),
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(files.replace_all(&service_id, inputs).await?)
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
