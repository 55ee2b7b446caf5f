//! Error types for dash-resources.

use dash_core::TreeError;
use thiserror::Error;

/// Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors that can occur while registering or resolving resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A resource with no form that can be served.
    #[error("{resource} does not have a relative_package_path, absolute_path, or an external_url.")]
    Unresolvable {
        /// JSON rendering of the offending resource.
        resource: String,
    },

    /// A long-form dependency whose list values differ in length.
    #[error("long-form resource lists have mismatched lengths: {lengths:?}")]
    InconsistentLongForm { lengths: Vec<usize> },

    /// A namespace that has no registered suite or no version.
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// A resource or suite document with an unsupported shape.
    #[error("invalid resource descriptor: {0}")]
    InvalidDescriptor(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Component metadata in a suite document failed to load.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ResourceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDescriptor(message.into())
    }
}
