//! Custom domain resource.

use rendercloud_client::RenderClient;
use rendercloud_client::api::CustomDomainFilters;
use serde_json::Value;

use crate::error::Result;
use crate::node::{list, success};
use crate::params::Parameters;
use crate::resource::Resource;
use crate::schema::{FieldSpec, ResourceDescriptor, limit, op, opt, return_all};

operations!("customDomain" {
    Add => "add",
    Delete => "delete",
    Get => "get",
    List => "list",
    VerifyDns => "verifyDns",
});

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        resource: Resource::CustomDomain,
        display_name: "Custom Domain",
        description: "Manage custom domains for services",
        default_operation: "list",
        operations: vec![
            op("add", "Add", "Add a custom domain to a service", "Add a custom domain"),
            op("delete", "Delete", "Remove a custom domain", "Delete a custom domain"),
            op("get", "Get", "Retrieve custom domain details", "Get a custom domain"),
            op("list", "List", "List custom domains for a service", "List custom domains"),
            op("verifyDns", "Verify DNS", "Verify DNS configuration for a domain", "Verify DNS for a custom domain"),
        ],
        fields: vec![
            FieldSpec::string("serviceId", "Service ID")
                .required()
                .description("The ID of the service (srv-xxxxx format)"),
            return_all(&["list"]),
            limit(&["list"], 20),
            FieldSpec::collection(
                "filters",
                "Filters",
                vec![
                    FieldSpec::string("name", "Name").description("Filter by domain name"),
                    FieldSpec::options(
                        "domainType",
                        "Domain Type",
                        vec![opt("Apex", "apex"), opt("Subdomain", "subdomain")],
                    )
                    .description("Filter by domain type"),
                    FieldSpec::options(
                        "verificationStatus",
                        "Verification Status",
                        vec![opt("Verified", "verified"), opt("Unverified", "unverified")],
                    )
                    .description("Filter by verification status"),
                    FieldSpec::date_time("createdBefore", "Created Before")
                        .description("Filter by creation date (before)"),
                    FieldSpec::date_time("createdAfter", "Created After")
                        .description("Filter by creation date (after)"),
                ],
            )
            .show_for(&["list"]),
            FieldSpec::string("customDomainId", "Custom Domain ID")
                .required()
                .description("The ID of the custom domain")
                .show_for(&["get", "delete", "verifyDns"]),
            FieldSpec::string("name", "Domain Name")
                .required()
                .description("The domain name to add")
                .show_for(&["add"]),
        ],
    }
}

fn filters(params: &Parameters) -> CustomDomainFilters {
    let f = params.collection("filters");
    CustomDomainFilters {
        name: f.optional_string("name"),
        domain_type: f.optional_string("domainType"),
        verification_status: f.optional_string("verificationStatus"),
        created_before: f.optional_string("createdBefore"),
        created_after: f.optional_string("createdAfter"),
    }
}

pub async fn execute(client: &RenderClient, operation: Operation, params: &Parameters) -> Result<Value> {
    let domains = client.custom_domains();
    let service_id = params.string("serviceId")?;
    match operation {
        Operation::List => {
            let mode = params.list_mode(20)?;
            Ok(list(domains.list(&service_id, &filters(params), mode).await?))
        }
        Operation::Get => Ok(domains.get(&service_id, &params.string("customDomainId")?).await?),
        Operation::Add => Ok(domains.add(&service_id, &params.string("name")?).await?),
        Operation::Delete => {
            let id = params.string("customDomainId")?;
            domains.delete(&service_id, &id).await?;
            Ok(success("customDomainId", &id))
        }
        Operation::VerifyDns => {
            Ok(domains.verify_dns(&service_id, &params.string("customDomainId")?).await?)
        }
    }
}
