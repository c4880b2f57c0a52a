//! Service environment variables API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_service_id;
use crate::pagination::unwrap_items;
use crate::request::ApiRequest;
use crate::types::{EnvVarInput, UpdateEnvVarsRequest};

/// Environment variables of a single service.
pub struct EnvVarsApi {
    client: RenderClient,
}

impl EnvVarsApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn base(service_id: &str) -> Result<String> {
        validate_service_id(service_id)?;
        Ok(format!("/services/{}/env-vars", encode_segment(service_id)))
    }

    /// List every variable in one request.
    pub async fn list(&self, service_id: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .request(ApiRequest::get(Self::base(service_id)?))
            .await?;
        Ok(unwrap_items(response, "envVar", usize::MAX))
    }

    pub async fn get(&self, service_id: &str, key: &str) -> Result<Value> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(key));
        self.client.request(ApiRequest::get(path)).await
    }

    /// Create or replace one variable.
    pub async fn set(&self, service_id: &str, var: &EnvVarInput) -> Result<Value> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(&var.key));
        self.client
            .request(ApiRequest::put(path).json_body(var)?)
            .await
    }

    pub async fn delete(&self, service_id: &str, key: &str) -> Result<()> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(key));
        self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// Replace the full set of variables.
    pub async fn replace_all(&self, service_id: &str, vars: Vec<EnvVarInput>) -> Result<Value> {
        let body = UpdateEnvVarsRequest { env_vars: vars };
        self.client
            .request(ApiRequest::put(Self::base(service_id)?).json_body(&body)?)
            .await
    }
}
