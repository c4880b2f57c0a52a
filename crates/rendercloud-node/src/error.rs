//! Node error types.

use thiserror::Error;

/// Error raised while executing a node item.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The Render API call (or identifier validation) failed.
    #[error(transparent)]
    Client(#[from] rendercloud_client::Error),

    /// A parameter the operation needs was absent or empty.
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    /// A parameter was present but could not be used.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The resource id is not one the node knows.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// The operation id is not defined for the resource.
    #[error("Unknown operation: {operation} for resource {resource}")]
    UnknownOperation {
        /// Resource id the operation was requested on.
        resource: String,
        /// The rejected operation id.
        operation: String,
    },
}

impl NodeError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_operation(resource: &str, operation: &str) -> Self {
        Self::UnknownOperation {
            resource: resource.to_string(),
            operation: operation.to_string(),
        }
    }
}

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;
