//! Postgres API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_postgres_id;
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{
    CreatePostgresRequest, CreatePostgresUserRequest, RecoveryRequest, UpdatePostgresRequest,
};

/// Filters for listing Postgres instances.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostgresFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Managed Postgres instances.
pub struct PostgresApi {
    client: RenderClient,
}

impl PostgresApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn path(postgres_id: &str, suffix: &str) -> Result<String> {
        validate_postgres_id(postgres_id)?;
        Ok(format!("/postgres/{}{}", encode_segment(postgres_id), suffix))
    }

    pub async fn list(&self, filters: &PostgresFilters, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get("/postgres").query_from(filters)?;
        self.client.list(req, "postgres", mode).await
    }

    pub async fn get(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::path(postgres_id, "")?))
            .await
    }

    pub async fn create(&self, request: &CreatePostgresRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post("/postgres").json_body(request)?)
            .await
    }

    pub async fn update(&self, postgres_id: &str, request: &UpdatePostgresRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::patch(Self::path(postgres_id, "")?).json_body(request)?)
            .await
    }

    pub async fn delete(&self, postgres_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::delete(Self::path(postgres_id, "")?))
            .await?;
        Ok(())
    }

    /// Internal and external connection strings.
    pub async fn connection_info(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::path(postgres_id, "/connection-info")?))
            .await
    }

    pub async fn suspend(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/suspend")?))
            .await
    }

    pub async fn resume(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/resume")?))
            .await
    }

    pub async fn restart(&self, postgres_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/restart")?))
            .await?;
        Ok(())
    }

    /// Fail over to the standby of a high-availability instance.
    pub async fn failover(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/failover")?))
            .await
    }

    pub async fn recovery_status(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::path(postgres_id, "/recovery")?))
            .await
    }

    /// Start a point-in-time recovery.
    pub async fn trigger_recovery(&self, postgres_id: &str, target_time: &str) -> Result<Value> {
        let body = RecoveryRequest {
            recovery_target_time: target_time.to_string(),
        };
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/recovery")?).json_body(&body)?)
            .await
    }

    pub async fn list_exports(&self, postgres_id: &str, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get(Self::path(postgres_id, "/exports")?);
        self.client.list(req, "export", mode).await
    }

    pub async fn create_export(&self, postgres_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/exports")?))
            .await
    }

    pub async fn list_users(&self, postgres_id: &str, mode: ListMode) -> Result<Vec<Value>> {
        let req = ApiRequest::get(Self::path(postgres_id, "/users")?);
        self.client.list(req, "user", mode).await
    }

    pub async fn create_user(&self, postgres_id: &str, username: &str) -> Result<Value> {
        let body = CreatePostgresUserRequest {
            username: username.to_string(),
        };
        self.client
            .request(ApiRequest::post(Self::path(postgres_id, "/users")?).json_body(&body)?)
            .await
    }

    pub async fn delete_user(&self, postgres_id: &str, user_id: &str) -> Result<()> {
        let path = Self::path(postgres_id, &format!("/users/{}", encode_segment(user_id)))?;
        self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }
}
