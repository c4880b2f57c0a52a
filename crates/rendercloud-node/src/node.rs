//! Item execution.

use std::sync::Once;

use rendercloud_client::RenderClient;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::params::Parameters;
use crate::resource::{NODE_DISPLAY_NAME, Resource};
use crate::resources;

static STARTUP_NOTICE: Once = Once::new();

/// Link from an output item back to the input item that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairedItem {
    pub item: usize,
}

/// One output item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeItem {
    pub json: Value,
    pub paired_item: PairedItem,
}

impl NodeItem {
    fn new(json: Value, item: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item },
        }
    }
}

/// The Render Cloud action node.
#[derive(Clone)]
pub struct RenderCloudNode {
    client: RenderClient,
}

impl RenderCloudNode {
    /// Create the node around an authenticated client.
    pub fn new(client: RenderClient) -> Self {
        STARTUP_NOTICE.call_once(|| {
            info!(
                node = NODE_DISPLAY_NAME,
                version = env!("CARGO_PKG_VERSION"),
                "Render Cloud node loaded"
            );
        });
        Self { client }
    }

    pub fn client(&self) -> &RenderClient {
        &self.client
    }

    /// Execute one operation per input item.
    ///
    /// Items run one after another. Array results are flattened into one
    /// output item per element. With `continue_on_fail`, a failing item
    /// produces `{"error": message}` and the run goes on; otherwise the first
    /// failure is returned.
    pub async fn execute(
        &self,
        resource: Resource,
        items: Vec<Parameters>,
        continue_on_fail: bool,
    ) -> Result<Vec<NodeItem>> {
        let mut output = Vec::new();

        for (index, params) in items.iter().enumerate() {
            match self.execute_item(resource, params).await {
                Ok(Value::Array(values)) => {
                    debug!(%resource, item = index, count = values.len(), "item produced list");
                    output.extend(values.into_iter().map(|v| NodeItem::new(v, index)));
                }
                Ok(value) => output.push(NodeItem::new(value, index)),
                Err(e) if continue_on_fail => {
                    warn!(%resource, item = index, error = %e, "item failed, continuing");
                    output.push(NodeItem::new(json!({ "error": e.to_string() }), index));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(output)
    }

    /// Execute a single item. The operation comes from the item's
    /// `operation` parameter, defaulting to the resource's default.
    pub async fn execute_item(&self, resource: Resource, params: &Parameters) -> Result<Value> {
        let operation = params.string_or("operation", resource.descriptor().default_operation);
        debug!(%resource, %operation, "executing");

        let client = &self.client;
        match resource {
            Resource::Service => {
                resources::service::execute(client, operation.parse()?, params).await
            }
            Resource::Deploy => resources::deploy::execute(client, operation.parse()?, params).await,
            Resource::CustomDomain => {
                resources::custom_domain::execute(client, operation.parse()?, params).await
            }
            Resource::EnvironmentVariable => {
                resources::environment_variable::execute(client, operation.parse()?, params).await
            }
            Resource::SecretFile => {
                resources::secret_file::execute(client, operation.parse()?, params).await
            }
            Resource::Project => {
                resources::project::execute(client, operation.parse()?, params).await
            }
            Resource::Environment => {
                resources::environment::execute(client, operation.parse()?, params).await
            }
            Resource::Postgres => {
                resources::postgres::execute(client, operation.parse()?, params).await
            }
            Resource::KeyValue => {
                resources::key_value::execute(client, operation.parse()?, params).await
            }
            Resource::Disk => resources::disk::execute(client, operation.parse()?, params).await,
            Resource::EnvironmentGroup => {
                resources::environment_group::execute(client, operation.parse()?, params).await
            }
            Resource::Webhook => {
                resources::webhook::execute(client, operation.parse()?, params).await
            }
        }
    }
}

/// Result of a call that returns no body.
pub(crate) fn success(id_param: &str, id: &str) -> Value {
    let mut out = serde_json::Map::new();
    out.insert("success".to_string(), Value::Bool(true));
    out.insert(id_param.to_string(), Value::String(id.to_string()));
    Value::Object(out)
}

/// Wrap a list result.
pub(crate) fn list(values: Vec<Value>) -> Value {
    Value::Array(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        assert_eq!(
            success("serviceId", "srv-1"),
            json!({"success": true, "serviceId": "srv-1"})
        );
    }

    #[test]
    fn test_node_item_serializes_paired_item() {
        let item = NodeItem::new(json!({"id": "srv-1"}), 3);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"json": {"id": "srv-1"}, "pairedItem": {"item": 3}})
        );
    }
}
