//! Services API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_service_id;
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{AutoscalingRequest, CreateServiceRequest, UpdateServiceRequest};

/// Filters for listing services.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// `all`, `suspended` or `not_suspended`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_after: Option<String>,
}

/// Services API client.
pub struct ServicesApi {
    client: RenderClient,
}

impl ServicesApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    /// List services.
    pub async fn list(&self, filters: &ServiceFilters, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get("/services").query_from(filters)?;
        self.client.list(req, "service", mode).await
    }

    /// Get a service by ID.
    pub async fn get(&self, service_id: &str) -> Result<Value> {
        validate_service_id(service_id)?;
        self.client
            .request(ApiRequest::get(format!("/services/{}", encode_segment(service_id))))
            .await
    }

    /// Create a service from a repository or an image.
    pub async fn create(&self, request: &CreateServiceRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post("/services").json_body(request)?)
            .await
    }

    /// Update a service.
    pub async fn update(&self, service_id: &str, request: &UpdateServiceRequest) -> Result<Value> {
        validate_service_id(service_id)?;
        self.client
            .request(
                ApiRequest::patch(format!("/services/{}", encode_segment(service_id)))
                    .json_body(request)?,
            )
            .await
    }

    /// Delete a service.
    pub async fn delete(&self, service_id: &str) -> Result<()> {
        validate_service_id(service_id)?;
        self.client
            .request(ApiRequest::delete(format!("/services/{}", encode_segment(service_id))))
            .await?;
        Ok(())
    }

    pub async fn suspend(&self, service_id: &str) -> Result<Value> {
        self.action(service_id, "suspend").await
    }

    pub async fn resume(&self, service_id: &str) -> Result<Value> {
        self.action(service_id, "resume").await
    }

    pub async fn restart(&self, service_id: &str) -> Result<()> {
        self.action(service_id, "restart").await?;
        Ok(())
    }

    /// Set a fixed instance count.
    pub async fn scale(&self, service_id: &str, num_instances: u32) -> Result<Value> {
        validate_service_id(service_id)?;
        let req = ApiRequest::post(format!("/services/{}/scale", encode_segment(service_id)))
            .json_body(&serde_json::json!({ "numInstances": num_instances }))?;
        self.client.request(req).await
    }

    /// Replace the autoscaling configuration.
    pub async fn update_autoscaling(
        &self,
        service_id: &str,
        request: &AutoscalingRequest,
    ) -> Result<Value> {
        validate_service_id(service_id)?;
        let req = ApiRequest::put(format!("/services/{}/autoscaling", encode_segment(service_id)))
            .json_body(request)?;
        self.client.request(req).await
    }

    /// Remove the autoscaling configuration.
    pub async fn delete_autoscaling(&self, service_id: &str) -> Result<()> {
        validate_service_id(service_id)?;
        self.client
            .request(ApiRequest::delete(format!(
                "/services/{}/autoscaling",
                encode_segment(service_id)
            )))
            .await?;
        Ok(())
    }

    /// Purge the build cache.
    pub async fn purge_cache(&self, service_id: &str) -> Result<()> {
        validate_service_id(service_id)?;
        self.client
            .request(ApiRequest::post(format!(
                "/services/{}/cache/purge",
                encode_segment(service_id)
            )))
            .await?;
        Ok(())
    }

    async fn action(&self, service_id: &str, verb: &str) -> Result<Value> {
        validate_service_id(service_id)?;
        self.client
            .request(ApiRequest::post(format!("/services/{}/{}", encode_segment(service_id), verb)))
            .await
    }
}
