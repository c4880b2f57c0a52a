//! Deploys API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::{validate_deploy_id, validate_service_id};
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::TriggerDeployRequest;

/// Time window for listing deploys (ISO 8601).
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Deploys of a single service.
pub struct DeploysApi {
    client: RenderClient,
}

impl DeploysApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    /// List deploys for a service.
    pub async fn list(
        &self,
        service_id: &str,
        filters: &DeployFilters,
        mode: ListMode,
    ) -> Result<Vec<Value>> {
        validate_service_id(service_id)?;
        let path = format!("/services/{}/deploys", encode_segment(service_id));
        let req = ApiRequest::get(path).query_from(filters)?;
        self.client.list(req, "deploy", mode).await
    }

    /// Get a deploy.
    pub async fn get(&self, service_id: &str, deploy_id: &str) -> Result<Value> {
        validate_service_id(service_id)?;
        validate_deploy_id(deploy_id)?;
        self.client
            .request(ApiRequest::get(format!(
                "/services/{}/deploys/{}",
                encode_segment(service_id), encode_segment(deploy_id)
            )))
            .await
    }

    /// Start a new deploy.
    pub async fn trigger(&self, service_id: &str, request: &TriggerDeployRequest) -> Result<Value> {
        validate_service_id(service_id)?;
        let path = format!("/services/{}/deploys", encode_segment(service_id));
        let req = ApiRequest::post(path).json_body(request)?;
        self.client.request(req).await
    }

    /// Cancel an in-progress deploy.
    pub async fn cancel(&self, service_id: &str, deploy_id: &str) -> Result<Value> {
        validate_service_id(service_id)?;
        validate_deploy_id(deploy_id)?;
        self.client
            .request(ApiRequest::post(format!(
                "/services/{}/deploys/{}/cancel",
                encode_segment(service_id), encode_segment(deploy_id)
            )))
            .await
    }

    /// Roll the service back to a previous deploy.
    pub async fn rollback(&self, service_id: &str, deploy_id: &str) -> Result<Value> {
        validate_service_id(service_id)?;
        validate_deploy_id(deploy_id)?;
        self.client
            .request(ApiRequest::post(format!(
                "/services/{}/rollback/{}",
                encode_segment(service_id), encode_segment(deploy_id)
            )))
            .await
    }
}
