//! Projects API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_project_id;
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{CreateProjectRequest, UpdateProjectRequest};

/// Filters for listing projects.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Projects API client.
pub struct ProjectsApi {
    client: RenderClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, filters: &ProjectFilters, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get("/projects").query_from(filters)?;
        self.client.list(req, "project", mode).await
    }

    pub async fn get(&self, project_id: &str) -> Result<Value> {
        validate_project_id(project_id)?;
        self.client
            .request(ApiRequest::get(format!("/projects/{}", encode_segment(project_id))))
            .await
    }

    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post("/projects").json_body(request)?)
            .await
    }

    pub async fn update(&self, project_id: &str, request: &UpdateProjectRequest) -> Result<Value> {
        validate_project_id(project_id)?;
        self.client
            .request(
                ApiRequest::patch(format!("/projects/{}", encode_segment(project_id)))
                    .json_body(request)?,
            )
            .await
    }

    pub async fn delete(&self, project_id: &str) -> Result<()> {
        validate_project_id(project_id)?;
        self.client
            .request(ApiRequest::delete(format!("/projects/{}", encode_segment(project_id))))
            .await?;
        Ok(())
    }
}
