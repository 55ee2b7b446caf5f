//! Error types for component trees.

use thiserror::Error;

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised while building, addressing, or mutating a component tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// No node in the searched subtree carries the requested id.
    #[error("No component with id '{id}' found in the tree")]
    NotFound { id: String },

    /// A children slot holds a value that is not absent, a scalar, a node,
    /// or a sequence of nodes and scalars.
    #[error("Invalid children structure: {reason}")]
    InvalidStructure { reason: String },

    /// A property name that is neither declared nor wildcard-prefixed.
    #[error("Unexpected keyword argument `{property}` for {component}\nAllowed arguments: {}", .allowed.join(", "))]
    UnexpectedProperty {
        component: String,
        property: String,
        allowed: Vec<String>,
    },

    #[error("Required argument `{property}` was not specified for {component}")]
    MissingRequiredProperty { component: String, property: String },

    /// An `id` that is set but is not a string, so it could never address
    /// the node.
    #[error("The `id` of {component} must be a string, got {kind}")]
    InvalidId {
        component: String,
        kind: &'static str,
    },

    /// Component metadata that cannot be turned into a schema.
    #[error("Invalid component metadata: {reason}")]
    InvalidMetadata { reason: String },
}

impl TreeError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn invalid_structure(reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            reason: reason.into(),
        }
    }

    /// Whether this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
