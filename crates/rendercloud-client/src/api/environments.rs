//! Project environments API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::{validate_environment_id, validate_project_id};
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{CreateEnvironmentRequest, EnvironmentResourcesRequest, UpdateEnvironmentRequest};

/// Environments inside a project.
pub struct EnvironmentsApi {
    client: RenderClient,
}

impl EnvironmentsApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn base(project_id: &str) -> Result<String> {
        validate_project_id(project_id)?;
        Ok(format!("/projects/{}/environments", encode_segment(project_id)))
    }

    fn item(project_id: &str, environment_id: &str) -> Result<String> {
        let base = Self::base(project_id)?;
        validate_environment_id(environment_id)?;
        Ok(format!("{}/{}", base, encode_segment(environment_id)))
    }

    pub async fn list(&self, project_id: &str, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get(Self::base(project_id)?);
        self.client.list(req, "environment", mode).await
    }

    pub async fn get(&self, project_id: &str, environment_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::item(project_id, environment_id)?))
            .await
    }

    pub async fn create(
        &self,
        project_id: &str,
        request: &CreateEnvironmentRequest,
    ) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::base(project_id)?).json_body(request)?)
            .await
    }

    pub async fn update(
        &self,
        project_id: &str,
        environment_id: &str,
        request: &UpdateEnvironmentRequest,
    ) -> Result<Value> {
        let path = Self::item(project_id, environment_id)?;
        self.client
            .request(ApiRequest::patch(path).json_body(request)?)
            .await
    }

    pub async fn delete(&self, project_id: &str, environment_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::delete(Self::item(project_id, environment_id)?))
            .await?;
        Ok(())
    }

    /// Move resources into the environment.
    pub async fn add_resources(
        &self,
        project_id: &str,
        environment_id: &str,
        resource_ids: Vec<String>,
    ) -> Result<Value> {
        let path = format!("{}/resources", Self::item(project_id, environment_id)?);
        let body = EnvironmentResourcesRequest { resource_ids };
        self.client
            .request(ApiRequest::post(path).json_body(&body)?)
            .await
    }

    /// Take resources out of the environment. The id list travels in the
    /// DELETE body.
    pub async fn remove_resources(
        &self,
        project_id: &str,
        environment_id: &str,
        resource_ids: Vec<String>,
    ) -> Result<Value> {
        let path = format!("{}/resources", Self::item(project_id, environment_id)?);
        let body = EnvironmentResourcesRequest { resource_ids };
        self.client
            .request(ApiRequest::delete(path).json_body(&body)?)
            .await
    }
}
