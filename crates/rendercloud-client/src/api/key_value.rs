//! Key Value (Redis-compatible) API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_key_value_id;
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{CreateKeyValueRequest, UpdateKeyValueRequest};

/// Filters for listing Key Value instances.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

pub struct KeyValueApi {
    client: RenderClient,
}

impl KeyValueApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn path(key_value_id: &str, suffix: &str) -> Result<String> {
        validate_key_value_id(key_value_id)?;
        Ok(format!("/key-value/{}{}", encode_segment(key_value_id), suffix))
    }

    pub async fn list(&self, filters: &KeyValueFilters, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get("/key-value").query_from(filters)?;
        self.client.list(req, "keyValue", mode).await
    }

    pub async fn get(&self, key_value_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::path(key_value_id, "")?))
            .await
    }

    pub async fn create(&self, request: &CreateKeyValueRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post("/key-value").json_body(request)?)
            .await
    }

    pub async fn update(&self, key_value_id: &str, request: &UpdateKeyValueRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::patch(Self::path(key_value_id, "")?).json_body(request)?)
            .await
    }

    pub async fn delete(&self, key_value_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::delete(Self::path(key_value_id, "")?))
            .await?;
        Ok(())
    }

    pub async fn connection_info(&self, key_value_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::path(key_value_id, "/connection-info")?))
            .await
    }

    pub async fn suspend(&self, key_value_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::path(key_value_id, "/suspend")?))
            .await
    }

    pub async fn resume(&self, key_value_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::path(key_value_id, "/resume")?))
            .await
    }
}
