//! Component nodes and their children slot.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::errors::{Result, TreeError};
use crate::schema::{ComponentSchema, CHILDREN};
use crate::types::{Scalar, Value};

/// Name of the property used to address nodes in a tree.
pub const ID: &str = "id";

/// One typed component instance.
///
/// The type tag and namespace come from the shared [`ComponentSchema`].
/// Nested content lives in the [`Children`] slot, which exclusively owns its
/// sub-nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    schema: Arc<ComponentSchema>,
    properties: IndexMap<String, Value>,
    children: Children,
}

/// The recursive edge of the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Children {
    #[default]
    Absent,
    Scalar(Scalar),
    Node(Box<Node>),
    List(Vec<Child>),
}

/// An entry of a sequence children slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Node),
    Scalar(Scalar),
}

impl Node {
    /// Create a node with no properties set.
    pub fn new(schema: Arc<ComponentSchema>) -> Self {
        Self {
            schema,
            properties: IndexMap::new(),
            children: Children::Absent,
        }
    }

    /// Start building a validated node.
    pub fn builder(schema: Arc<ComponentSchema>) -> NodeBuilder {
        NodeBuilder::new(schema)
    }

    pub fn schema(&self) -> &Arc<ComponentSchema> {
        &self.schema
    }

    /// The component type tag.
    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    /// The library the component type comes from.
    pub fn namespace(&self) -> &str {
        self.schema.namespace()
    }

    /// The node's `id`, if it is set to a string.
    pub fn id(&self) -> Option<&str> {
        self.properties.get(ID).and_then(Value::as_str)
    }

    /// Get a property value. `children` is held in its own slot, see
    /// [`Node::children`].
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// All properties except `children`, in insertion order.
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// Properties whose names match one of the schema's wildcard prefixes.
    pub fn wildcard_properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties
            .iter()
            .filter(|(k, _)| self.schema.is_wildcard(k))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Set a property, returning the previous value (`Undefined` if unset).
    ///
    /// An `id` must be a string, null, or undefined. Setting `children` converts the value into a [`Children`] slot and
    /// fails with `InvalidStructure` if it has no such shape.
    pub fn set_property(&mut self, name: &str, value: impl Into<Value>) -> Result<Value> {
        if !self.schema.accepts(name) {
            return Err(self.schema.unexpected(name));
        }

        let value = value.into();
        if name == ID {
            check_id(&self.schema, &value)?;
        }
        if name == CHILDREN {
            let children = Children::try_from(value)?;
            return Ok(self.set_children(children).into());
        }

        Ok(self
            .properties
            .insert(name.to_string(), value)
            .unwrap_or_default())
    }

    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        if name == CHILDREN {
            return match self.take_children() {
                Children::Absent => None,
                children => Some(children.into()),
            };
        }
        self.properties.shift_remove(name)
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Children {
        &mut self.children
    }

    /// Replace the children slot, returning the old one.
    pub fn set_children(&mut self, children: impl Into<Children>) -> Children {
        std::mem::replace(&mut self.children, children.into())
    }

    pub fn take_children(&mut self) -> Children {
        std::mem::take(&mut self.children)
    }

    /// Whether a property counts as set for display purposes.
    fn is_set(&self, name: &str) -> bool {
        if name == CHILDREN {
            !self.children.is_absent()
        } else {
            self.properties.get(name).is_some_and(|v| !v.is_nullish())
        }
    }

    fn fmt_prop(&self, name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if name == CHILDREN {
            return write!(f, "{}", self.children);
        }
        match self.properties.get(name) {
            Some(value) if !value.is_undefined() => write!(f, "{value}"),
            _ => write!(f, "None"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.schema.prop_names();
        let others_set = names.iter().skip(1).any(|p| self.is_set(p))
            || self.wildcard_properties().any(|(_, v)| !v.is_nullish());

        write!(f, "{}(", self.type_name())?;
        if others_set {
            let mut first = true;
            let set_props = names.iter().map(String::as_str).filter(|p| self.is_set(p));
            let wildcards = self
                .wildcard_properties()
                .filter(|(_, v)| !v.is_undefined())
                .map(|(k, _)| k);
            for name in set_props.chain(wildcards) {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{name}=")?;
                self.fmt_prop(name, f)?;
            }
        } else {
            match names.first() {
                Some(name) => self.fmt_prop(name, f)?,
                None => write!(f, "None")?,
            }
        }
        write!(f, ")")
    }
}

impl Children {
    pub fn is_absent(&self) -> bool {
        matches!(self, Children::Absent)
    }

    /// The single child node, if the slot holds exactly one node.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Children::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Child]> {
        match self {
            Children::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Node> for Children {
    fn from(node: Node) -> Self {
        Children::Node(Box::new(node))
    }
}

impl From<Scalar> for Children {
    fn from(scalar: Scalar) -> Self {
        Children::Scalar(scalar)
    }
}

impl From<&str> for Children {
    fn from(s: &str) -> Self {
        Children::Scalar(s.into())
    }
}

impl From<String> for Children {
    fn from(s: String) -> Self {
        Children::Scalar(s.into())
    }
}

impl<T: Into<Child>> From<Vec<T>> for Children {
    fn from(items: Vec<T>) -> Self {
        Children::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for Children {
    type Error = TreeError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Undefined | Value::Null => Ok(Children::Absent),
            Value::String(s) => Ok(Children::Scalar(Scalar::String(s))),
            Value::Number(n) => Ok(Children::Scalar(Scalar::Number(n))),
            Value::Node(node) => Ok(Children::Node(node)),
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Node(node) => Ok(Child::Node(*node)),
                    Value::String(s) => Ok(Child::Scalar(Scalar::String(s))),
                    Value::Number(n) => Ok(Child::Scalar(Scalar::Number(n))),
                    other => Err(TreeError::invalid_structure(format!(
                        "children[{i}] is a {}, expected a component, string, or number",
                        other.kind_name()
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Children::List),
            other => Err(TreeError::invalid_structure(format!(
                "children cannot be a {}",
                other.kind_name()
            ))),
        }
    }
}

impl From<Children> for Value {
    fn from(children: Children) -> Self {
        match children {
            Children::Absent => Value::Undefined,
            Children::Scalar(scalar) => scalar.into(),
            Children::Node(node) => Value::Node(node),
            Children::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl fmt::Display for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Children::Absent => write!(f, "None"),
            Children::Scalar(scalar) => write!(f, "{scalar}"),
            Children::Node(node) => write!(f, "{node}"),
            Children::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Child {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Scalar(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Scalar(_) => None,
        }
    }

    /// The entry's id; scalars never have one.
    pub fn id(&self) -> Option<&str> {
        self.as_node().and_then(Node::id)
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Scalar> for Child {
    fn from(scalar: Scalar) -> Self {
        Child::Scalar(scalar)
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Scalar(s.into())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Scalar(s.into())
    }
}

impl From<Child> for Value {
    fn from(child: Child) -> Self {
        match child {
            Child::Node(node) => node.into(),
            Child::Scalar(scalar) => scalar.into(),
        }
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Node(node) => write!(f, "{node}"),
            Child::Scalar(scalar) => write!(f, "{scalar}"),
        }
    }
}

/// Builder that validates property names against the schema.
///
/// This is the construction layer: unknown names are rejected and required
/// properties enforced when [`NodeBuilder::build`] runs.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    schema: Arc<ComponentSchema>,
    properties: IndexMap<String, Value>,
    children: Option<Value>,
}

impl NodeBuilder {
    pub fn new(schema: Arc<ComponentSchema>) -> Self {
        Self {
            schema,
            properties: IndexMap::new(),
            children: None,
        }
    }

    /// Set a property. `children` may be given here as any [`Value`].
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name == CHILDREN {
            self.children = Some(value.into());
        } else {
            self.properties.insert(name, value.into());
        }
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.prop(ID, Value::String(id.into()))
    }

    pub fn children(mut self, children: impl Into<Children>) -> Self {
        let children: Children = children.into();
        self.children = Some(Value::from(children));
        self
    }

    pub fn build(self) -> Result<Node> {
        let schema = self.schema;

        if self.children.is_some() && !schema.has_children() {
            return Err(schema.unexpected(CHILDREN));
        }
        if let Some(name) = self.properties.keys().find(|k| !schema.accepts(k)) {
            return Err(schema.unexpected(name));
        }

        if let Some(id) = self.properties.get(ID) {
            check_id(&schema, id)?;
        }

        for required in schema.required() {
            if required == CHILDREN {
                continue;
            }
            let given = self
                .properties
                .get(required)
                .is_some_and(|v| !v.is_undefined());
            if !given {
                return Err(TreeError::MissingRequiredProperty {
                    component: schema.type_name().to_string(),
                    property: required.clone(),
                });
            }
        }

        let children = match self.children {
            Some(value) => Children::try_from(value)?,
            None => Children::Absent,
        };

        Ok(Node {
            schema,
            properties: self.properties,
            children,
        })
    }
}

fn check_id(schema: &ComponentSchema, id: &Value) -> Result<()> {
    match id {
        Value::Undefined | Value::Null | Value::String(_) => Ok(()),
        other => Err(TreeError::InvalidId {
            component: schema.type_name().to_string(),
            kind: other.kind_name(),
        }),
    }
}
