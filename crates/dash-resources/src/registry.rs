//! Registry of component suites and the resources they ship.

use std::sync::Arc;

use dash_core::ComponentSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{ResourceError, Result};

/// Which resource list of a suite is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "js")]
    Scripts,
    #[serde(rename = "css")]
    Stylesheets,
}

impl ResourceKind {
    /// Key of this list in a suite document.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            ResourceKind::Scripts => "_js_dist",
            ResourceKind::Stylesheets => "_css_dist",
        }
    }
}

/// One entry of a suite's script or stylesheet list.
///
/// At least one location should be set for the entry to be servable; see
/// [`Resources::all_resources`](crate::Resources::all_resources).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_package_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_package_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dynamic: bool,
}

impl ResourceDescriptor {
    /// A resource served from a CDN, with an optional bundled copy.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            external_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// A resource bundled with the suite's package.
    pub fn package(path: impl Into<String>) -> Self {
        Self {
            relative_package_path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_relative_package_path(mut self, path: impl Into<String>) -> Self {
        self.relative_package_path = Some(path.into());
        self
    }

    pub fn with_dev_package_path(mut self, path: impl Into<String>) -> Self {
        self.dev_package_path = Some(path.into());
        self
    }

    pub fn with_absolute_path(mut self, path: impl Into<String>) -> Self {
        self.absolute_path = Some(path.into());
        self
    }

    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Mark the resource as loaded on demand rather than at page load.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }
}

/// A package of components sharing one namespace, with its version, its
/// scripts and stylesheets, and the schemas of its component types.
#[derive(Debug, Clone, Default)]
pub struct ComponentSuite {
    namespace: String,
    version: Option<String>,
    scripts: Vec<ResourceDescriptor>,
    stylesheets: Vec<ResourceDescriptor>,
    components: IndexMap<String, Arc<ComponentSchema>>,
}

impl ComponentSuite {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Load a suite from a JSON document:
    ///
    /// ```json
    /// {
    ///   "version": "1.0.0",
    ///   "_js_dist": [{"relative_package_path": "bundle.js"}],
    ///   "_css_dist": [],
    ///   "components": {"Graph": {"props": {"id": {"type": {"name": "string"}}}}}
    /// }
    /// ```
    ///
    /// All keys are optional. Component entries are react-docgen metadata.
    pub fn from_json(namespace: impl Into<String>, document: &JsonValue) -> Result<Self> {
        let namespace = namespace.into();
        let object = document
            .as_object()
            .ok_or_else(|| ResourceError::invalid(format!("suite '{namespace}' must be an object")))?;

        let mut suite = Self::new(namespace.as_str());

        match object.get("version") {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::String(version)) => suite.version = Some(version.clone()),
            Some(other) => {
                return Err(ResourceError::invalid(format!(
                    "suite '{namespace}' has a non-string version: {other}"
                )))
            }
        }

        for kind in [ResourceKind::Scripts, ResourceKind::Stylesheets] {
            if let Some(list) = object.get(kind.attribute_name()) {
                let descriptors: Vec<ResourceDescriptor> = serde_json::from_value(list.clone())?;
                for descriptor in descriptors {
                    suite = suite.with_resource(kind, descriptor);
                }
            }
        }

        if let Some(components) = object.get("components") {
            let components = components.as_object().ok_or_else(|| {
                ResourceError::invalid(format!("components of suite '{namespace}' must be an object"))
            })?;
            for (type_name, metadata) in components {
                let props = metadata.get("props").unwrap_or(metadata);
                let schema = ComponentSchema::from_metadata(type_name.as_str(), namespace.as_str(), props)?;
                suite = suite.with_component(schema);
            }
        }

        Ok(suite)
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_script(self, descriptor: ResourceDescriptor) -> Self {
        self.with_resource(ResourceKind::Scripts, descriptor)
    }

    pub fn with_stylesheet(self, descriptor: ResourceDescriptor) -> Self {
        self.with_resource(ResourceKind::Stylesheets, descriptor)
    }

    /// Add a resource to one of the lists.
    pub fn with_resource(mut self, kind: ResourceKind, descriptor: ResourceDescriptor) -> Self {
        match kind {
            ResourceKind::Scripts => self.scripts.push(descriptor),
            ResourceKind::Stylesheets => self.stylesheets.push(descriptor),
        }
        self
    }

    /// Add a component type. Schemas from another namespace are kept as given.
    pub fn with_component(mut self, schema: Arc<ComponentSchema>) -> Self {
        self.components.insert(schema.type_name().to_string(), schema);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The suite's list for `kind`, untagged.
    pub fn resources(&self, kind: ResourceKind) -> &[ResourceDescriptor] {
        match kind {
            ResourceKind::Scripts => &self.scripts,
            ResourceKind::Stylesheets => &self.stylesheets,
        }
    }

    /// The suite's list for `kind`, each entry tagged with this namespace.
    pub fn tagged_resources(&self, kind: ResourceKind) -> impl Iterator<Item = ResourceDescriptor> + '_ {
        self.resources(kind)
            .iter()
            .map(|r| r.clone().with_namespace(self.namespace.as_str()))
    }

    pub fn component(&self, type_name: &str) -> Option<&Arc<ComponentSchema>> {
        self.components.get(type_name)
    }

    pub fn components(&self) -> impl Iterator<Item = &Arc<ComponentSchema>> {
        self.components.values()
    }
}

/// Registry of component suites, keyed by namespace.
///
/// Suites are registered explicitly, usually once at startup. Iteration
/// follows registration order.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    suites: IndexMap<String, ComponentSuite>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            suites: IndexMap::new(),
        }
    }

    /// Register a suite, returning the one it replaces.
    ///
    /// A replaced suite keeps its original position.
    pub fn register(&mut self, suite: ComponentSuite) -> Option<ComponentSuite> {
        debug!(
            namespace = suite.namespace(),
            scripts = suite.scripts.len(),
            stylesheets = suite.stylesheets.len(),
            "Registered component suite"
        );
        self.suites.insert(suite.namespace.clone(), suite)
    }

    pub fn get(&self, namespace: &str) -> Option<&ComponentSuite> {
        self.suites.get(namespace)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.suites.contains_key(namespace)
    }

    /// Registered namespaces, in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(|s| s.as_str())
    }

    /// Version of the suite registered under `namespace`.
    pub fn version(&self, namespace: &str) -> Result<&str> {
        self.get(namespace)
            .and_then(ComponentSuite::version)
            .ok_or_else(|| ResourceError::UnknownNamespace(namespace.to_string()))
    }

    /// Every suite's list for `kind`, concatenated in registration order and
    /// tagged with the owning namespace.
    pub fn resources(&self, kind: ResourceKind) -> Vec<ResourceDescriptor> {
        self.suites
            .values()
            .flat_map(|suite| suite.tagged_resources(kind))
            .collect()
    }

    /// Schema of `type_name` in `namespace`.
    pub fn schema(&self, namespace: &str, type_name: &str) -> Option<&Arc<ComponentSchema>> {
        self.get(namespace)?.component(type_name)
    }

    /// Number of registered suites.
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}
