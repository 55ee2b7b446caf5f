//! Core types for Dash component trees.
//!
//! This crate provides the data model shared by the other dash crates:
//! - [`Node`]: one typed component instance with its properties
//! - [`Children`]: the recursive slot holding a node's nested content
//! - [`ComponentSchema`]: the type definition a node is validated against
//! - The canonical form handed to the rendering boundary
//! - Error types

pub mod canonical;
pub mod errors;
pub mod node;
pub mod schema;
pub mod types;

pub use canonical::{serialize, to_json, CanonicalForm, PropertyRef};
pub use errors::{Result, TreeError};
pub use node::{Child, Children, Node, NodeBuilder, ID};
pub use schema::{ComponentSchema, SchemaBuilder, CHILDREN};
pub use types::{Scalar, Value};
