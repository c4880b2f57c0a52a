//! Service secret files API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_service_id;
use crate::pagination::unwrap_items;
use crate::request::ApiRequest;
use crate::types::{SecretFileInput, UpdateSecretFilesRequest};

/// Secret files of a single service.
///
/// File names are percent-encoded in paths; contents go over the wire base64
/// encoded.
pub struct SecretFilesApi {
    client: RenderClient,
}

impl SecretFilesApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn base(service_id: &str) -> Result<String> {
        validate_service_id(service_id)?;
        Ok(format!("/services/{}/secret-files", encode_segment(service_id)))
    }

    pub async fn list(&self, service_id: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .request(ApiRequest::get(Self::base(service_id)?))
            .await?;
        Ok(unwrap_items(response, "secretFile", usize::MAX))
    }

    pub async fn get(&self, service_id: &str, name: &str) -> Result<Value> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(name));
        self.client.request(ApiRequest::get(path)).await
    }

    /// Create or replace one file from plain-text contents.
    pub async fn set(&self, service_id: &str, name: &str, contents: &str) -> Result<Value> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(name));
        let body = SecretFileInput::from_plain(name, contents);
        self.client
            .request(ApiRequest::put(path).json_body(&body)?)
            .await
    }

    pub async fn delete(&self, service_id: &str, name: &str) -> Result<()> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(name));
        self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// Replace the full set of files. Inputs must already be encoded.
    pub async fn replace_all(&self, service_id: &str, files: Vec<SecretFileInput>) -> Result<Value> {
        let body = UpdateSecretFilesRequest {
            secret_files: files,
        };
        self.client
            .request(ApiRequest::put(Self::base(service_id)?).json_body(&body)?)
            .await
    }
}
