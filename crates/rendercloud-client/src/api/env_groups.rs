//! Environment groups API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::{validate_env_group_id, validate_service_id};
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{
    CreateEnvGroupRequest, EnvVarInput, LinkServiceRequest, SecretFileInput,
    UpdateEnvGroupRequest,
};

/// Filters for listing environment groups.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvGroupFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Environment groups shared between services.
pub struct EnvGroupsApi {
    client: RenderClient,
}

impl EnvGroupsApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn path(env_group_id: &str, suffix: &str) -> Result<String> {
        validate_env_group_id(env_group_id)?;
        Ok(format!("/env-groups/{}{}", encode_segment(env_group_id), suffix))
    }

    pub async fn list(&self, filters: &EnvGroupFilters, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get("/env-groups").query_from(filters)?;
        self.client.list(req, "envGroup", mode).await
    }

    pub async fn get(&self, env_group_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::path(env_group_id, "")?))
            .await
    }

    pub async fn create(&self, request: &CreateEnvGroupRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post("/env-groups").json_body(request)?)
            .await
    }

    pub async fn update(&self, env_group_id: &str, request: &UpdateEnvGroupRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::patch(Self::path(env_group_id, "")?).json_body(request)?)
            .await
    }

    pub async fn delete(&self, env_group_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::delete(Self::path(env_group_id, "")?))
            .await?;
        Ok(())
    }

    pub async fn link_service(&self, env_group_id: &str, service_id: &str) -> Result<Value> {
        self.service_link(env_group_id, service_id, "/link-service").await
    }

    pub async fn unlink_service(&self, env_group_id: &str, service_id: &str) -> Result<Value> {
        self.service_link(env_group_id, service_id, "/unlink-service").await
    }

    async fn service_link(&self, env_group_id: &str, service_id: &str, verb: &str) -> Result<Value> {
        let path = Self::path(env_group_id, verb)?;
        validate_service_id(service_id)?;
        let body = LinkServiceRequest {
            service_id: service_id.to_string(),
        };
        self.client
            .request(ApiRequest::post(path).json_body(&body)?)
            .await
    }

    pub async fn get_env_var(&self, env_group_id: &str, key: &str) -> Result<Value> {
        let path = Self::path(env_group_id, &format!("/env-vars/{}", encode_segment(key)))?;
        self.client.request(ApiRequest::get(path)).await
    }

    pub async fn set_env_var(&self, env_group_id: &str, var: &EnvVarInput) -> Result<Value> {
        let path = Self::path(env_group_id, &format!("/env-vars/{}", encode_segment(&var.key)))?;
        self.client
            .request(ApiRequest::put(path).json_body(var)?)
            .await
    }

    pub async fn delete_env_var(&self, env_group_id: &str, key: &str) -> Result<()> {
        let path = Self::path(env_group_id, &format!("/env-vars/{}", encode_segment(key)))?;
        self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }

    pub async fn get_secret_file(&self, env_group_id: &str, name: &str) -> Result<Value> {
        let path = Self::path(env_group_id, &format!("/secret-files/{}", encode_segment(name)))?;
        self.client.request(ApiRequest::get(path)).await
    }

    /// Create or replace a secret file from plain-text contents.
    pub async fn set_secret_file(
        &self,
        env_group_id: &str,
        name: &str,
        contents: &str,
    ) -> Result<Value> {
        let path = Self::path(env_group_id, &format!("/secret-files/{}", encode_segment(name)))?;
        let body = SecretFileInput::from_plain(name, contents);
        self.client
            .request(ApiRequest::put(path).json_body(&body)?)
            .await
    }

    pub async fn delete_secret_file(&self, env_group_id: &str, name: &str) -> Result<()> {
        let path = Self::path(env_group_id, &format!("/secret-files/{}", encode_segment(name)))?;
        self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
