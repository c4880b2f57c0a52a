//! Persistent disks API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::{validate_disk_id, validate_service_id};
use crate::pagination::ListMode;
use crate::request::ApiRequest;
use crate::types::{AddDiskRequest, UpdateDiskRequest};

/// Disks attached to a service, and their snapshots.
pub struct DisksApi {
    client: RenderClient,
}

impl DisksApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn base(service_id: &str) -> Result<String> {
        validate_service_id(service_id)?;
        Ok(format!("/services/{}/disks", encode_segment(service_id)))
    }

    fn item(service_id: &str, disk_id: &str) -> Result<String> {
        let base = Self::base(service_id)?;
        validate_disk_id(disk_id)?;
        Ok(format!("{}/{}", base, encode_segment(disk_id)))
    }

    pub async fn list(&self, service_id: &str, mode: ListMode) -> Result<Vec<Value>> {
        self.client
            .list(ApiRequest::get(Self::base(service_id)?), "disk", mode)
            .await
    }

    pub async fn get(&self, service_id: &str, disk_id: &str) -> Result<Value> {
        self.client
            .request(ApiRequest::get(Self::item(service_id, disk_id)?))
            .await
    }

    pub async fn add(&self, service_id: &str, request: &AddDiskRequest) -> Result<Value> {
        self.client
            .request(ApiRequest::post(Self::base(service_id)?).json_body(request)?)
            .await
    }

    pub async fn update(
        &self,
        service_id: &str,
        disk_id: &str,
        request: &UpdateDiskRequest,
    ) -> Result<Value> {
        self.client
            .request(ApiRequest::patch(Self::item(service_id, disk_id)?).json_body(request)?)
            .await
    }

    pub async fn delete(&self, service_id: &str, disk_id: &str) -> Result<()> {
        self.client
            .request(ApiRequest::delete(Self::item(service_id, disk_id)?))
            .await?;
        Ok(())
    }

    pub async fn list_snapshots(
        &self,
        service_id: &str,
        disk_id: &str,
        mode: ListMode,
    ) -> Result<Vec<Value>> {
        let path = format!("{}/snapshots", Self::item(service_id, disk_id)?);
        self.client.list(ApiRequest::get(path), "snapshot", mode).await
    }

    pub async fn restore_snapshot(
        &self,
        service_id: &str,
        disk_id: &str,
        snapshot_id: &str,
    ) -> Result<Value> {
        let path = format!(
            "{}/snapshots/{}/restore",
            Self::item(service_id, disk_id)?,
            encode_segment(snapshot_id)
        );
        self.client.request(ApiRequest::post(path)).await
    }
}
