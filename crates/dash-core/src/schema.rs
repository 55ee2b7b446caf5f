//! Component type definitions.
//!
//! A [`ComponentSchema`] describes one component type: its name, the
//! namespace of the library it comes from, the declared property names, and
//! the wildcard prefixes whose properties are passed through unvalidated.
//! Nodes share their schema through an `Arc`, so the wildcard prefixes live
//! on the type, not on every instance.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::errors::{Result, TreeError};

/// Name of the property holding a node's nested content.
pub const CHILDREN: &str = "children";

/// Wildcard entries recognized in component metadata.
const WILDCARD_ATTRIBUTES: [&str; 2] = ["data-*", "aria-*"];

/// PropTypes that cannot be expressed as data.
const UNSUPPORTED_PROP_TYPES: [&str; 3] = ["func", "symbol", "instanceOf"];

/// Properties used for event subscription, never set as data.
const EVENT_PROPS: [&str; 1] = ["dashEvents"];

/// Definition of a component type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSchema {
    type_name: String,
    namespace: String,
    prop_names: Vec<String>,
    required: Vec<String>,
    wildcard_prefixes: Vec<String>,
}

impl ComponentSchema {
    /// Start building a schema.
    pub fn builder(type_name: impl Into<String>, namespace: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(type_name, namespace)
    }

    /// Build a schema from react-docgen style metadata, a JSON object of
    /// `{propName: propMetadata}`.
    ///
    /// Props without a `type` or `flowType` are dropped, as are function-like
    /// props and `dashEvents`. `children` is moved to the front, and
    /// `data-*` / `aria-*` entries become wildcard prefixes.
    pub fn from_metadata(
        type_name: impl Into<String>,
        namespace: impl Into<String>,
        props: &JsonValue,
    ) -> Result<Arc<Self>> {
        let props = props.as_object().ok_or_else(|| TreeError::InvalidMetadata {
            reason: "props metadata must be an object".into(),
        })?;

        let mut builder = SchemaBuilder::new(type_name, namespace);

        for wildcard in WILDCARD_ATTRIBUTES {
            if props.contains_key(wildcard) {
                builder = builder.wildcard(wildcard.trim_end_matches('*'));
            }
        }

        for (name, meta) in props {
            if WILDCARD_ATTRIBUTES.contains(&name.as_str()) || !keep_prop(name, meta)? {
                continue;
            }
            builder = builder.prop(name.as_str());
            if meta.get("required").and_then(JsonValue::as_bool) == Some(true) {
                builder = builder.required(name.as_str());
            }
        }

        Ok(builder.build())
    }

    /// The component type tag.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The library the type comes from.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Declared property names, `children` first when declared.
    pub fn prop_names(&self) -> &[String] {
        &self.prop_names
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn wildcard_prefixes(&self) -> &[String] {
        &self.wildcard_prefixes
    }

    pub fn declares(&self, name: &str) -> bool {
        self.prop_names.iter().any(|p| p == name)
    }

    pub fn is_wildcard(&self, name: &str) -> bool {
        self.wildcard_prefixes.iter().any(|w| name.starts_with(w.as_str()))
    }

    /// Whether `name` may be set on instances of this type.
    pub fn accepts(&self, name: &str) -> bool {
        self.declares(name) || self.is_wildcard(name)
    }

    /// Whether instances can hold nested content.
    pub fn has_children(&self) -> bool {
        self.declares(CHILDREN)
    }

    /// Error for a property this type does not accept.
    pub(crate) fn unexpected(&self, property: &str) -> TreeError {
        let mut allowed = self.prop_names.clone();
        allowed.sort();
        TreeError::UnexpectedProperty {
            component: self.type_name.clone(),
            property: property.to_string(),
            allowed,
        }
    }
}

fn keep_prop(name: &str, meta: &JsonValue) -> Result<bool> {
    if EVENT_PROPS.contains(&name) {
        return Ok(false);
    }

    if let Some(prop_type) = meta.get("type") {
        let type_name = prop_type
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| TreeError::InvalidMetadata {
                reason: format!("prop '{name}' has a type without a name"),
            })?;
        return Ok(!UNSUPPORTED_PROP_TYPES.contains(&type_name));
    }

    if let Some(flow_type) = meta.get("flowType") {
        // Flow signatures are only data when they describe an object.
        if flow_type.get("name").and_then(JsonValue::as_str) == Some("signature") {
            return Ok(flow_type.get("type").and_then(JsonValue::as_str) == Some("object"));
        }
        return Ok(true);
    }

    Ok(false)
}

/// Builder for [`ComponentSchema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    type_name: String,
    namespace: String,
    prop_names: Vec<String>,
    required: Vec<String>,
    wildcard_prefixes: Vec<String>,
}

impl SchemaBuilder {
    pub fn new(type_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            namespace: namespace.into(),
            prop_names: Vec::new(),
            required: Vec::new(),
            wildcard_prefixes: Vec::new(),
        }
    }

    /// Declare a property.
    pub fn prop(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.prop_names.contains(&name) {
            self.prop_names.push(name);
        }
        self
    }

    /// Declare several properties.
    pub fn props<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |b, name| b.prop(name))
    }

    /// Declare a required property.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.prop(name)
    }

    /// Accept properties starting with `prefix` (e.g. `data-`).
    pub fn wildcard(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !self.wildcard_prefixes.contains(&prefix) {
            self.wildcard_prefixes.push(prefix);
        }
        self
    }

    pub fn build(mut self) -> Arc<ComponentSchema> {
        // children always leads the declared props
        if let Some(pos) = self.prop_names.iter().position(|p| p == CHILDREN) {
            let children = self.prop_names.remove(pos);
            self.prop_names.insert(0, children);
        }

        Arc::new(ComponentSchema {
            type_name: self.type_name,
            namespace: self.namespace,
            prop_names: self.prop_names,
            required: self.required,
            wildcard_prefixes: self.wildcard_prefixes,
        })
    }
}
