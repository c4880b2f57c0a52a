//! Resource enumeration and the descriptor registry.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde_json::{Value, json};

use crate::error::NodeError;
use crate::resources;
use crate::schema::{FieldOption, ResourceDescriptor};

/// Node type name as registered with the host.
pub const NODE_NAME: &str = "renderCloud";

/// Human-readable node name.
pub const NODE_DISPLAY_NAME: &str = "Render Cloud";

/// Credential type the node requires.
pub const CREDENTIAL_NAME: &str = "renderCloudApi";

/// A Render resource family the node can operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Service,
    Deploy,
    CustomDomain,
    EnvironmentVariable,
    SecretFile,
    Project,
    Environment,
    Postgres,
    KeyValue,
    Disk,
    EnvironmentGroup,
    Webhook,
}

impl Resource {
    /// Every resource, in registry order.
    pub const ALL: [Resource; 12] = [
        Resource::Service,
        Resource::Deploy,
        Resource::CustomDomain,
        Resource::EnvironmentVariable,
        Resource::SecretFile,
        Resource::Project,
        Resource::Environment,
        Resource::Postgres,
        Resource::KeyValue,
        Resource::Disk,
        Resource::EnvironmentGroup,
        Resource::Webhook,
    ];

    /// Identifier as the host spells it.
    pub fn id(&self) -> &'static str {
        match self {
            Resource::Service => "service",
            Resource::Deploy => "deploy",
            Resource::CustomDomain => "customDomain",
            Resource::EnvironmentVariable => "environmentVariable",
            Resource::SecretFile => "secretFile",
            Resource::Project => "project",
            Resource::Environment => "environment",
            Resource::Postgres => "postgres",
            Resource::KeyValue => "keyValue",
            Resource::Disk => "disk",
            Resource::EnvironmentGroup => "environmentGroup",
            Resource::Webhook => "webhook",
        }
    }

    /// The registered descriptor of this resource.
    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        &registry()[*self as usize]
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Resource {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.id() == s)
            .ok_or_else(|| NodeError::UnknownResource(s.to_string()))
    }
}

fn register_all() -> Vec<ResourceDescriptor> {
    vec![
        resources::service::descriptor(),
        resources::deploy::descriptor(),
        resources::custom_domain::descriptor(),
        resources::environment_variable::descriptor(),
        resources::secret_file::descriptor(),
        resources::project::descriptor(),
        resources::environment::descriptor(),
        resources::postgres::descriptor(),
        resources::key_value::descriptor(),
        resources::disk::descriptor(),
        resources::environment_group::descriptor(),
        resources::webhook::descriptor(),
    ]
}

/// All resource descriptors, indexed by [`Resource`] discriminant.
///
/// Built on first use.
pub fn registry() -> &'static [ResourceDescriptor] {
    static REGISTRY: OnceLock<Vec<ResourceDescriptor>> = OnceLock::new();
    REGISTRY.get_or_init(register_all)
}

/// Render the full node description the host loads.
pub fn node_description() -> Value {
    let resource_options: Vec<Value> = registry()
        .iter()
        .map(|d| {
            json!({
                "name": d.display_name,
                "value": d.resource.id(),
                "description": d.description,
            })
        })
        .collect();

    let mut properties = vec![json!({
        "displayName": "Resource",
        "name": "resource",
        "type": "options",
        "noDataExpression": true,
        "options": resource_options,
        "default": Resource::Service.id(),
    })];
    for descriptor in registry() {
        properties.extend(descriptor.to_json());
    }

    json!({
        "displayName": NODE_DISPLAY_NAME,
        "name": NODE_NAME,
        "group": ["transform"],
        "version": 1,
        "subtitle": "={{$parameter[\"operation\"] + \": \" + $parameter[\"resource\"]}}",
        "description": "Interact with Render Cloud API to manage services, databases, and deployments",
        "defaults": { "name": NODE_DISPLAY_NAME },
        "inputs": ["main"],
        "outputs": ["main"],
        "credentials": [{ "name": CREDENTIAL_NAME, "required": true }],
        "properties": properties,
    })
}

/// Provider webhook events, as offered in event selectors.
pub(crate) fn event_options() -> Vec<FieldOption> {
    use crate::schema::opt;
    vec![
        opt("Certificate Renewed", "certificate_renewed"),
        opt("Deploy Canceled", "deploy_canceled"),
        opt("Deploy Failed", "deploy_failed"),
        opt("Deploy Started", "deploy_started"),
        opt("Deploy Succeeded", "deploy_succeeded"),
        opt("Maintenance Completed", "maintenance_completed"),
        opt("Maintenance Started", "maintenance_started"),
        opt("Server Available", "server_available"),
        opt("Server Failed", "server_failed"),
        opt("Service Created", "service_created"),
        opt("Service Deleted", "service_deleted"),
        opt("Service Resumed", "service_resumed"),
        opt("Service Suspended", "service_suspended"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_enum() {
        let registry = registry();
        assert_eq!(registry.len(), Resource::ALL.len());
        for (i, resource) in Resource::ALL.iter().enumerate() {
            assert_eq!(registry[i].resource, *resource);
            assert_eq!(resource.descriptor().resource, *resource);
        }
    }

    #[test]
    fn test_resource_round_trips_through_id() {
        for resource in Resource::ALL {
            assert_eq!(resource.id().parse::<Resource>().unwrap(), resource);
        }
        assert!(matches!(
            "server".parse::<Resource>(),
            Err(NodeError::UnknownResource(id)) if id == "server"
        ));
    }

    #[test]
    fn test_every_operation_has_a_unique_id() {
        for descriptor in registry() {
            let mut ids: Vec<_> = descriptor.operations.iter().map(|o| o.id).collect();
            let len = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), len, "duplicate operation in {}", descriptor.resource);
            assert!(descriptor.operation(descriptor.default_operation).is_some());
        }
    }

    #[test]
    fn test_fields_only_name_known_operations() {
        for descriptor in registry() {
            for field in &descriptor.fields {
                for op in &field.show_for {
                    assert!(
                        descriptor.operation(op).is_some(),
                        "{}.{} shown for unknown operation {}",
                        descriptor.resource,
                        field.name,
                        op
                    );
                }
            }
        }
    }

    #[test]
    fn test_node_description_lists_all_resources() {
        let description = node_description();
        assert_eq!(description["name"], "renderCloud");
        assert_eq!(description["credentials"][0]["name"], "renderCloudApi");
        let resources = &description["properties"][0]["options"];
        assert_eq!(resources.as_array().unwrap().len(), 12);
        assert_eq!(description["properties"][0]["default"], "service");
        let key_value = resources
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["value"] == "keyValue")
            .unwrap();
        assert_eq!(key_value["name"], "Key Value (Redis)");
    }
}
