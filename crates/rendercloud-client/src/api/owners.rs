//! Owners API.

use serde_json::Value;

use crate::client::RenderClient;
use crate::error::Result;
use crate::pagination::ListMode;
use crate::request::ApiRequest;

/// Owners (users and teams) visible to the API key.
pub struct OwnersApi {
    client: RenderClient,
}

impl OwnersApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    /// List owners.
    pub async fn list(&self, mode: ListMode) -> Result<Vec<Value>> {
        self.client
            .list(ApiRequest::get("/owners"), "owner", mode)
            .await
    }

    /// Cheapest authenticated call; succeeds when the API key is accepted.
    pub async fn check_credentials(&self) -> Result<()> {
        self.client
            .request(ApiRequest::get("/owners").query_param("limit", 1))
            .await?;
        Ok(())
    }
}
