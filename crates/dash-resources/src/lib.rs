//! Resource resolution for Dash layouts.
//!
//! Component suites ship the scripts and stylesheets their components need.
//! This crate keeps track of them:
//! - [`ComponentRegistry`]: suites registered explicitly by namespace
//! - [`extract_resources`]: the resources of the suites a layout uses
//! - [`Resources`]: inferred plus appended resources, resolved to the form
//!   they are served in
//! - [`ResourceManager`]: page-level registration and `<link>`/`<script>`
//!   tag rendering

pub mod error;
pub mod extract;
pub mod manager;
pub mod registry;
pub mod resources;

pub use error::{ResourceError, Result};
pub use extract::extract_resources;
pub use manager::{Resource, ResourceForm, ResourceManager};
pub use registry::{ComponentRegistry, ComponentSuite, ResourceDescriptor, ResourceKind};
pub use resources::{ResourceConfig, Resources, ServedResource, ServedSource};
