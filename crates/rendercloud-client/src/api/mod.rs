//! Per-resource API accessors.
//!
//! Every accessor validates identifier prefixes before building a path, so a
//! malformed id fails without touching the network.

mod custom_domains;
mod deploys;
mod disks;
mod env_groups;
mod env_vars;
mod environments;
mod key_value;
mod owners;
mod postgres;
mod projects;
mod secret_files;
mod services;
mod webhooks;

pub use custom_domains::{CustomDomainFilters, CustomDomainsApi};
pub use deploys::{DeployFilters, DeploysApi};
pub use disks::DisksApi;
pub use env_groups::{EnvGroupFilters, EnvGroupsApi};
pub use env_vars::EnvVarsApi;
pub use environments::EnvironmentsApi;
pub use key_value::{KeyValueApi, KeyValueFilters};
pub use owners::OwnersApi;
pub use postgres::{PostgresApi, PostgresFilters};
pub use projects::{ProjectFilters, ProjectsApi};
pub use secret_files::SecretFilesApi;
pub use services::{ServiceFilters, ServicesApi};
pub use webhooks::{WebhookEventFilters, WebhooksApi};

/// Percent-encode one path segment.
///
/// Every caller-supplied id, key or name goes through here, so `/`, `?` and
/// `#` cannot leave the segment. Bare dot segments are refused later by the
/// gateway.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("config/app.json"), "config%2Fapp.json");
        assert_eq!(encode_segment(".env"), ".env");
        assert_eq!(encode_segment("my file"), "my%20file");
    }

    #[test]
    fn test_encode_segment_keeps_ids_intact() {
        assert_eq!(encode_segment("srv-abc123"), "srv-abc123");
        assert_eq!(encode_segment("www.example.com"), "www.example.com");
        assert_eq!(encode_segment("DATABASE_URL"), "DATABASE_URL");
    }

    #[test]
    fn test_encode_segment_neutralizes_separators() {
        assert_eq!(
            encode_segment("srv-/../../postgres/dpg-victim"),
            "srv-%2F..%2F..%2Fpostgres%2Fdpg-victim"
        );
        assert_eq!(encode_segment("x?ownerId=y#z"), "x%3FownerId%3Dy%23z");
    }
}
