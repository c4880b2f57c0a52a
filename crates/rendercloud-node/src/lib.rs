//! Render Cloud workflow node.
//!
//! Maps a host's per-item parameters onto the typed Render client. The node
//! exposes twelve resources; each declares its operations and input fields
//! as a [`ResourceDescriptor`] and dispatches through a closed
//! [`Resource`] enum.
//!
//! # Example
//!
//! ```no_run
//! use rendercloud_client::RenderClient;
//! use rendercloud_node::{Parameters, RenderCloudNode, Resource};
//!
//! # async fn example() -> rendercloud_node::Result<()> {
//! let client = RenderClient::builder().api_key("rnd_xxx").build()?;
//! let node = RenderCloudNode::new(client);
//!
//! let item = Parameters::new()
//!     .with("operation", "get")
//!     .with("serviceId", "srv-abc123");
//! for out in node.execute(Resource::Service, vec![item], false).await? {
//!     println!("{}", out.json);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod node;
pub mod params;
pub mod resource;
pub mod resources;
pub mod schema;

pub use error::{NodeError, Result};
pub use node::{NodeItem, PairedItem, RenderCloudNode};
pub use params::Parameters;
pub use resource::{NODE_NAME, Resource, node_description, registry};
pub use schema::{FieldKind, FieldOption, FieldSpec, OperationSpec, ResourceDescriptor};
