//! Registration of page resources and rendering of their HTML tags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{ResourceError, Result};
use crate::registry::{ComponentRegistry, ResourceDescriptor, ResourceKind};

/// Shape in which a resource is given at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceForm {
    /// A bare URL, or a map of HTML attributes.
    Raw,
    /// A component suite dependency record, or its long form.
    Dependency,
}

/// A registered script or stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub external_url: Option<String>,
    pub relative_package_path: Option<String>,
    pub dev_package_path: Option<String>,
    pub namespace: Option<String>,
    /// HTML attributes used when no URL applies.
    pub attributes: IndexMap<String, String>,
    /// Loaded on demand; never rendered into the page.
    pub dynamic: bool,
}

impl Resource {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            external_url: None,
            relative_package_path: None,
            dev_package_path: None,
            namespace: None,
            attributes: IndexMap::new(),
            dynamic: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DependencyRecord {
    external_url: Option<String>,
    relative_package_path: Option<String>,
    dev_package_path: Option<String>,
    namespace: Option<String>,
    #[serde(default)]
    attributes: IndexMap<String, String>,
    #[serde(default)]
    dynamic: bool,
}

/// Scripts and stylesheets of a page, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ResourceManager {
    resources: Vec<Resource>,
    serve_scripts_locally: bool,
    serve_css_locally: bool,
    serve_dev_bundles: bool,
}

impl ResourceManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager holding external scripts and stylesheets in raw form.
    pub fn with_external(scripts: &[JsonValue], stylesheets: &[JsonValue]) -> Result<Self> {
        let mut manager = Self::new();
        manager.register_resources(scripts, ResourceKind::Scripts, ResourceForm::Raw)?;
        manager.register_resources(stylesheets, ResourceKind::Stylesheets, ResourceForm::Raw)?;
        Ok(manager)
    }

    pub fn set_serve_css_locally(&mut self, serve_locally: bool) {
        self.serve_css_locally = serve_locally;
    }

    pub fn set_serve_scripts_locally(&mut self, serve_locally: bool) {
        self.serve_scripts_locally = serve_locally;
    }

    pub fn set_serve_dev_bundles(&mut self, dev_bundles: bool) {
        self.serve_dev_bundles = dev_bundles;
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Namespaces that registered scripts, in first-registration order.
    pub fn registered_namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = Vec::new();
        for ns in self.of_kind(ResourceKind::Scripts).filter_map(|r| r.namespace.as_deref()) {
            if !namespaces.contains(&ns) {
                namespaces.push(ns);
            }
        }
        namespaces
    }

    /// Package paths of the scripts registered by `namespace`.
    pub fn registered_paths(&self, namespace: &str) -> Vec<&str> {
        self.of_kind(ResourceKind::Scripts)
            .filter(|r| r.namespace.as_deref() == Some(namespace))
            .filter_map(|r| r.relative_package_path.as_deref())
            .collect()
    }

    pub fn register_resources(
        &mut self,
        resources: &[JsonValue],
        kind: ResourceKind,
        form: ResourceForm,
    ) -> Result<()> {
        resources
            .iter()
            .try_for_each(|resource| self.register_resource(resource, kind, form))
    }

    /// Register one resource.
    ///
    /// Raw resources are a URL string, which becomes the `src` (scripts) or
    /// `href` (stylesheets) attribute, or a map of attributes kept as is.
    /// Dependencies are records with `external_url`, `relative_package_path`,
    /// `dev_package_path`, `namespace`, `attributes` and `dynamic` keys.
    /// A dependency whose list-valued keys all hold more than one entry is
    /// in long form and is split into one record per index.
    pub fn register_resource(
        &mut self,
        resource: &JsonValue,
        kind: ResourceKind,
        form: ResourceForm,
    ) -> Result<()> {
        let registered = match form {
            ResourceForm::Raw => raw_resource(resource, kind)?,
            ResourceForm::Dependency => {
                if let Some(records) = split_long_form(resource)? {
                    debug!(records = records.len(), "Expanded long-form resource");
                    return self.register_resources(&records, kind, form);
                }
                dependency_resource(resource, kind)?
            }
        };

        self.resources.push(registered);
        Ok(())
    }

    /// Register a suite descriptor as a dependency.
    pub fn register_descriptor(&mut self, descriptor: &ResourceDescriptor, kind: ResourceKind) {
        self.resources.push(Resource {
            external_url: descriptor.external_url.clone(),
            relative_package_path: descriptor.relative_package_path.clone(),
            dev_package_path: descriptor.dev_package_path.clone(),
            namespace: descriptor.namespace.clone(),
            dynamic: descriptor.dynamic,
            ..Resource::new(kind)
        });
    }

    /// Register the scripts and stylesheets of every suite in `registry`.
    pub fn register_registry(&mut self, registry: &ComponentRegistry) {
        for kind in [ResourceKind::Scripts, ResourceKind::Stylesheets] {
            for descriptor in registry.resources(kind) {
                self.register_descriptor(&descriptor, kind);
            }
        }
    }

    /// `<link rel="stylesheet" ...>` tags for every non-dynamic stylesheet,
    /// one per line.
    pub fn generate_links(&self) -> String {
        self.of_kind(ResourceKind::Stylesheets)
            .filter(|r| !r.dynamic)
            .map(|resource| {
                let url = if self.serve_css_locally {
                    resource.relative_package_path.as_deref()
                } else {
                    resource.external_url.as_deref()
                };
                let attributes = match url {
                    Some(href) => render_attributes([("href", href)]),
                    None => render_attributes(resource.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))),
                };
                format!("<link rel=\"stylesheet\" {attributes}>")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `<script>` tags for every non-dynamic script, one per line.
    ///
    /// When serving locally, package scripts are loaded from
    /// `_dash-component-suites/{namespace}/{path}?v={version}&m=1`, with the
    /// version taken from `registry`. Scripts with neither a usable URL nor a
    /// `src` attribute are left out.
    pub fn generate_scripts(&self, registry: &ComponentRegistry) -> Result<String> {
        let mut tags = Vec::new();

        for resource in self.of_kind(ResourceKind::Scripts).filter(|r| !r.dynamic) {
            let package_path = if self.serve_dev_bundles {
                resource
                    .dev_package_path
                    .as_deref()
                    .or(resource.relative_package_path.as_deref())
            } else {
                resource.relative_package_path.as_deref()
            };

            let tag = match (self.serve_scripts_locally, package_path, &resource.external_url) {
                (true, Some(path), _) => {
                    let namespace = resource.namespace.as_deref().ok_or_else(|| {
                        ResourceError::invalid(format!("package script '{path}' has no namespace"))
                    })?;
                    let version = registry.version(namespace)?;
                    let src = format!("_dash-component-suites/{namespace}/{path}?v={version}&m=1");
                    script_tag(render_attributes([("src", src.as_str())]))
                }
                (false, _, Some(url)) => script_tag(render_attributes([("src", url.as_str())])),
                _ if resource.attributes.contains_key("src") => script_tag(render_attributes(
                    resource.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                )),
                _ => continue,
            };
            tags.push(tag);
        }

        Ok(tags.join("\n"))
    }

    fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }
}

fn raw_resource(resource: &JsonValue, kind: ResourceKind) -> Result<Resource> {
    let mut registered = Resource::new(kind);
    match resource {
        JsonValue::String(url) => {
            let key = match kind {
                ResourceKind::Scripts => "src",
                ResourceKind::Stylesheets => "href",
            };
            registered.external_url = Some(url.clone());
            registered.attributes.insert(key.to_string(), url.clone());
        }
        JsonValue::Object(map) => {
            for (name, value) in map {
                let value = match value {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                };
                registered.attributes.insert(name.clone(), value);
            }
        }
        other => {
            return Err(ResourceError::invalid(format!(
                "raw resource must be a URL or an attribute map, got {other}"
            )))
        }
    }
    Ok(registered)
}

fn dependency_resource(resource: &JsonValue, kind: ResourceKind) -> Result<Resource> {
    if !resource.is_object() {
        return Err(ResourceError::invalid(format!(
            "dependency resource must be an object, got {resource}"
        )));
    }
    let record: DependencyRecord = serde_json::from_value(resource.clone())?;
    Ok(Resource {
        external_url: record.external_url,
        relative_package_path: record.relative_package_path,
        dev_package_path: record.dev_package_path,
        namespace: record.namespace,
        attributes: record.attributes,
        dynamic: record.dynamic,
        kind,
    })
}

/// Split a long-form dependency into records, or `None` for record form.
fn split_long_form(resource: &JsonValue) -> Result<Option<Vec<JsonValue>>> {
    let Some(map) = resource.as_object() else {
        return Ok(None);
    };

    let lengths: Vec<usize> = map
        .values()
        .filter_map(|v| v.as_array().map(Vec::len))
        .collect();
    if lengths.is_empty() || lengths.iter().any(|&n| n <= 1) {
        return Ok(None);
    }
    if lengths.iter().any(|&n| n != lengths[0]) {
        return Err(ResourceError::InconsistentLongForm { lengths });
    }

    let records = (0..lengths[0])
        .map(|i| {
            let record = map
                .iter()
                .map(|(k, v)| {
                    let value = match v {
                        JsonValue::Array(items) => items[i].clone(),
                        other => other.clone(),
                    };
                    (k.clone(), value)
                })
                .collect();
            JsonValue::Object(record)
        })
        .collect();
    Ok(Some(records))
}

fn render_attributes<'a>(attributes: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    attributes
        .into_iter()
        .map(|(name, value)| format!("{name}=\"{value}\""))
        .collect::<Vec<_>>()
        .join(" ")
}

fn script_tag(attributes: String) -> String {
    format!("<script {attributes}></script>")
}
