//! Project resource.

use rendercloud_client::api::ProjectFilters;
use rendercloud_client::{CreateProjectRequest, RenderClient, UpdateProjectRequest};
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, return_all};

operations!("project" {
    Create => "create",
    Delete => "delete",
    Get => "get",
    List => "list",
    Update => "update",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::Project,
        display_name: "Project",
        description: "Manage Render projects",
        default_operation: "list",
        operations: vec![
            op("create", "Create", "Create a new project", "Create a project"),
            op("delete", "Delete", "Delete a project", "Delete a project"),
            op("get", "Get", "Retrieve project details", "Get a project"),
            op("list", "List", "List all projects", "List projects"),
            op("update", "Update", "Update project configuration", "Update a project"),
        ],
        fields: vec![
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::string("ownerId", "Owner ID").description("Filter by workspace owner ID"),
                    FieldSpec::string("name", "Name").description("Filter by project name"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("projectId", "Project ID")
                .required()
                .description("The ID of the project (prj-xxxxx format)")
                .show_for(&["get", "delete", "update"]),
            FieldSpec::string("name", "Name")
                .required()
                .description("The name of the project")
                .show_for(&["create"]),
            FieldSpec::string("ownerId", "Owner ID")
                .required()
                .description("The ID of the owner (user or team)")
                .show_for(&["create"]),
            FieldSpec::collection(
                "additionalOptions",
                "Additional Options",
                vec![FieldSpec::string("description", "Description").description("Description of the project")],
            )
            .show_for(&["create"]),
            FieldSpec::collection(
                "updateFields",
                "Update Fields",
                vec![
                    FieldSpec::string("name", "Name").description("The name of the project"),
                    FieldSpec::string("description", "Description").description("Description of the project"),
                ],
            )
            .show_for(&["update"]),
        ],
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let projects = client.projects();
    match operation {
        Operation::List => {
            let f = params.collection("filters");
            let filters = ProjectFilters {
                owner_id: f.optional_string("ownerId"),
                name: f.optional_string("name"),
            };
            Ok(list(projects.list(&filters, params.list_mode(20)?).await?))
        }
        Operation::Get => Ok(projects.get(&params.string("projectId")?).await?),
        Operation::Create => {
            let request = CreateProjectRequest {
                name: params.string("name")?,
                owner_id: params.string("ownerId")?,
                description: params.collection("additionalOptions").optional_string("description"),
            };
            Ok(projects.create(&request).await?)
        }
        Operation::Update => {
            let id = params.string("projectId")?;
            let fields = params.collection("updateFields");
            let request = UpdateProjectRequest {
                name: fields.optional_string("name"),
                description: fields.optional_string("description"),
            };
            Ok(projects.update(&id, &request).await?)
        }
        Operation::Delete => {
            let id = params.string("projectId")?;
            projects.delete(&id).await?;
            Ok(success("projectId", &id))
        }
    }
}
