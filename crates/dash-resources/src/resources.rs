//! Script and stylesheet collections for a page.

use dash_core::Node;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ResourceError, Result};
use crate::extract::extract_resources;
use crate::registry::{ComponentRegistry, ResourceDescriptor, ResourceKind};

/// Options for collecting resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Include the resources of every component suite used in the layout.
    pub infer_from_layout: bool,
    /// Serve bundled copies instead of external URLs.
    pub serve_locally: bool,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            infer_from_layout: true,
            serve_locally: false,
        }
    }
}

impl ResourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_infer_from_layout(mut self, infer: bool) -> Self {
        self.infer_from_layout = infer;
        self
    }

    pub fn with_serve_locally(mut self, serve_locally: bool) -> Self {
        self.serve_locally = serve_locally;
        self
    }
}

/// Where a resolved resource is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServedSource {
    External {
        external_url: String,
        /// Bundled copy of the same file, if the descriptor names one.
        #[serde(skip_serializing_if = "Option::is_none")]
        local_file: Option<String>,
    },
    Package { relative_package_path: String },
    Absolute { absolute_path: String },
    Asset { asset_path: String },
}

/// A resource in the form it is served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServedResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub source: ServedSource,
}

/// The scripts or the stylesheets of a page: those inferred from the
/// layout plus those appended by hand.
#[derive(Debug, Clone)]
pub struct Resources {
    kind: ResourceKind,
    config: ResourceConfig,
    appended: Vec<ResourceDescriptor>,
}

impl Resources {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            config: ResourceConfig::default(),
            appended: Vec::new(),
        }
    }

    pub fn scripts() -> Self {
        Self::new(ResourceKind::Scripts)
    }

    pub fn stylesheets() -> Self {
        Self::new(ResourceKind::Stylesheets)
    }

    pub fn with_config(mut self, config: ResourceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ResourceConfig {
        &mut self.config
    }

    pub fn append_resource(&mut self, resource: ResourceDescriptor) {
        self.appended.push(resource);
    }

    pub fn appended(&self) -> &[ResourceDescriptor] {
        &self.appended
    }

    /// Resources of the suites used under `root`, see [`extract_resources`].
    pub fn inferred_resources(&self, root: &Node, registry: &ComponentRegistry) -> Vec<ResourceDescriptor> {
        extract_resources(root, registry, self.kind)
    }

    /// Inferred (when enabled) then appended resources, resolved to the
    /// form they are served in.
    pub fn all_resources(
        &self,
        root: &Node,
        registry: &ComponentRegistry,
        dev_bundles: bool,
    ) -> Result<Vec<ServedResource>> {
        let mut all = if self.config.infer_from_layout {
            self.inferred_resources(root, registry)
        } else {
            Vec::new()
        };
        all.extend(self.appended.iter().cloned());

        self.filter_resources(&all, dev_bundles)
    }

    /// Pick the served form of each resource.
    ///
    /// In order of preference: the external URL unless serving locally,
    /// the dev bundle when `dev_bundles` is set, the package path, the
    /// absolute path, the asset path. A resource with none of these is
    /// skipped with a warning when serving locally, and is an error
    /// otherwise.
    pub fn filter_resources(
        &self,
        resources: &[ResourceDescriptor],
        dev_bundles: bool,
    ) -> Result<Vec<ServedResource>> {
        let mut served = Vec::with_capacity(resources.len());

        for resource in resources {
            let source = match resource {
                ResourceDescriptor {
                    external_url: Some(url),
                    ..
                } if !self.config.serve_locally => ServedSource::External {
                    external_url: url.clone(),
                    local_file: resource.relative_package_path.clone(),
                },
                ResourceDescriptor {
                    dev_package_path: Some(path),
                    ..
                } if dev_bundles => ServedSource::Package {
                    relative_package_path: path.clone(),
                },
                ResourceDescriptor {
                    relative_package_path: Some(path),
                    ..
                } => ServedSource::Package {
                    relative_package_path: path.clone(),
                },
                ResourceDescriptor {
                    absolute_path: Some(path),
                    ..
                } => ServedSource::Absolute {
                    absolute_path: path.clone(),
                },
                ResourceDescriptor {
                    asset_path: Some(path),
                    ..
                } => ServedSource::Asset {
                    asset_path: path.clone(),
                },
                _ if self.config.serve_locally => {
                    warn!(
                        external_url = resource.external_url.as_deref().unwrap_or_default(),
                        namespace = resource.namespace.as_deref().unwrap_or_default(),
                        "A local version of the resource is not available"
                    );
                    continue;
                }
                _ => {
                    return Err(ResourceError::Unresolvable {
                        resource: serde_json::to_string(resource)?,
                    })
                }
            };

            served.push(ServedResource {
                namespace: resource.namespace.clone(),
                source,
            });
        }

        Ok(served)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ComponentSuite;
    use dash_core::ComponentSchema;
    use serde_json::json;

    fn layout() -> Node {
        let html = ComponentSchema::builder("Div", "dash_html_components")
            .props(["children", "id"])
            .build();
        let core = ComponentSchema::builder("Graph", "dash_core_components")
            .props(["id", "figure"])
            .build();
        let mut root = Node::new(html);
        root.set_children(Node::new(core));
        root
    }

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry.register(
            ComponentSuite::new("dash_html_components").with_script(
                ResourceDescriptor::external("https://unpkg.com/dash-html-components@0.13.2/bundle.js")
                    .with_relative_package_path("bundle.js")
                    .with_dev_package_path("bundle.dev.js"),
            ),
        );
        registry.register(
            ComponentSuite::new("dash_core_components")
                .with_script(ResourceDescriptor::package("plotly.min.js")),
        );
        registry
    }

    #[test]
    fn test_config_defaults() {
        let config = ResourceConfig::default();
        assert!(config.infer_from_layout);
        assert!(!config.serve_locally);

        let parsed: ResourceConfig = serde_json::from_value(json!({"serve_locally": true})).unwrap();
        assert_eq!(parsed, ResourceConfig::new().with_serve_locally(true));
    }

    #[test]
    fn test_external_urls_by_default() {
        let scripts = Resources::scripts();
        let served = scripts.all_resources(&layout(), &registry(), false).unwrap();

        assert_eq!(
            serde_json::to_value(&served).unwrap(),
            json!([
                {
                    "namespace": "dash_html_components",
                    "external_url": "https://unpkg.com/dash-html-components@0.13.2/bundle.js",
                    "local_file": "bundle.js"
                },
                {"namespace": "dash_core_components", "relative_package_path": "plotly.min.js"}
            ])
        );
    }

    #[test]
    fn test_serve_locally_and_dev_bundles() {
        let scripts = Resources::scripts().with_config(ResourceConfig::new().with_serve_locally(true));

        let served = scripts.all_resources(&layout(), &registry(), false).unwrap();
        assert_eq!(
            served[0].source,
            ServedSource::Package {
                relative_package_path: "bundle.js".into()
            }
        );

        let dev = scripts.all_resources(&layout(), &registry(), true).unwrap();
        assert_eq!(
            dev[0].source,
            ServedSource::Package {
                relative_package_path: "bundle.dev.js".into()
            }
        );
    }

    #[test]
    fn test_appended_follow_inferred() {
        let mut css = Resources::stylesheets();
        css.append_resource(ResourceDescriptor::default().with_absolute_path("/srv/site.css"));
        css.append_resource(ResourceDescriptor::default().with_asset_path("custom.css"));

        let served = css.all_resources(&layout(), &registry(), false).unwrap();
        assert_eq!(
            served.iter().map(|r| r.source.clone()).collect::<Vec<_>>(),
            [
                ServedSource::Absolute {
                    absolute_path: "/srv/site.css".into()
                },
                ServedSource::Asset {
                    asset_path: "custom.css".into()
                },
            ]
        );
        assert!(served.iter().all(|r| r.namespace.is_none()));
    }

    #[test]
    fn test_inference_can_be_disabled() {
        let mut scripts = Resources::scripts();
        scripts.config_mut().infer_from_layout = false;
        scripts.append_resource(ResourceDescriptor::external("https://cdn.example.com/extra.js"));

        let served = scripts.all_resources(&layout(), &registry(), false).unwrap();
        assert_eq!(served.len(), 1);
        assert_eq!(scripts.inferred_resources(&layout(), &registry()).len(), 2);
    }

    #[test]
    fn test_external_only_skipped_when_serving_locally() {
        let mut scripts = Resources::scripts().with_config(
            ResourceConfig::new()
                .with_infer_from_layout(false)
                .with_serve_locally(true),
        );
        scripts.append_resource(ResourceDescriptor::external("https://cdn.example.com/extra.js"));
        scripts.append_resource(ResourceDescriptor::package("local.js"));

        let served = scripts.all_resources(&layout(), &registry(), false).unwrap();
        assert_eq!(served.len(), 1);
        assert_eq!(
            served[0].source,
            ServedSource::Package {
                relative_package_path: "local.js".into()
            }
        );
    }

    #[test]
    fn test_unresolvable_resource() {
        let scripts = Resources::scripts();
        let err = scripts
            .filter_resources(&[ResourceDescriptor::default().with_namespace("broken")], false)
            .unwrap_err();

        match err {
            ResourceError::Unresolvable { resource } => assert_eq!(resource, r#"{"namespace":"broken"}"#),
            other => panic!("unexpected error: {other}"),
        }
    }
}
