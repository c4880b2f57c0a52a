//! Custom domains API.

use serde_json::Value;

use super::encode_segment;
use crate::client::RenderClient;
use crate::error::Result;
use crate::identifiers::validate_service_id;
use crate::pagination::ListMode;
use crate::request::ApiRequest;

/// Filters for listing custom domains.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `apex` or `subdomain`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<String>,
    /// `verified` or `unverified`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<String>,
}

/// Custom domains attached to a service.
pub struct CustomDomainsApi {
    client: RenderClient,
}

impl CustomDomainsApi {
    pub(crate) fn new(client: RenderClient) -> Self {
        Self { client }
    }

    fn base(service_id: &str) -> Result<String> {
        validate_service_id(service_id)?;
        Ok(format!("/services/{}/custom-domains", encode_segment(service_id)))
    }

    pub async fn list(
        &self,
        service_id: &str,
        filters: &CustomDomainFilters,
        mode: ListMode,
    ) -> Result<Vec<Value>> {
        let req = ApiRequest::get(Self::base(service_id)?).query_from(filters)?;
        self.client.list(req, "customDomain", mode).await
    }

    /// Get a domain by id or name.
    pub async fn get(&self, service_id: &str, domain: &str) -> Result<Value> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(domain));
        self.client.request(ApiRequest::get(path)).await
    }

    /// Attach a domain name to the service.
    pub async fn add(&self, service_id: &str, name: &str) -> Result<Value> {
        let req = ApiRequest::post(Self::base(service_id)?)
            .json_body(&serde_json::json!({ "name": name }))?;
        self.client.request(req).await
    }

    pub async fn delete(&self, service_id: &str, domain: &str) -> Result<()> {
        let path = format!("{}/{}", Self::base(service_id)?, encode_segment(domain));
        self.client.request(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// Ask Render to re-check the domain's DNS records.
    pub async fn verify_dns(&self, service_id: &str, domain: &str) -> Result<Value> {
        let path = format!("{}/{}/verify", Self::base(service_id)?, encode_segment(domain));
        self.client.request(ApiRequest::post(path)).await
    }
}
