//! Canonical form of a node for the rendering boundary.
//!
//! [`serialize`] is shallow: it borrows one node's properties without
//! converting nested nodes. Nested nodes are turned into their own canonical
//! form only when a serde serializer walks the result, through the
//! `Serialize` impls on [`Node`], [`Children`], and [`Value`].

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::node::{Child, Children, Node};
use crate::schema::CHILDREN;
use crate::types::Value;

/// `{ properties, type, namespace }` view of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalForm<'a> {
    pub properties: IndexMap<&'a str, PropertyRef<'a>>,
    #[serde(rename = "type")]
    pub type_name: &'a str,
    pub namespace: &'a str,
}

/// A borrowed property value in a canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyRef<'a> {
    Value(&'a Value),
    Children(&'a Children),
}

impl<'a> PropertyRef<'a> {
    /// The nested node held directly by this property, if any.
    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            PropertyRef::Value(value) => value.as_node(),
            PropertyRef::Children(children) => children.as_node(),
        }
    }
}

/// Canonical form of `node`, one level deep.
///
/// Declared properties come first in schema order, followed by wildcard
/// properties in the order they were set. Undefined properties and an absent
/// children slot are omitted; explicit nulls are kept.
pub fn serialize(node: &Node) -> CanonicalForm<'_> {
    let schema = node.schema();
    let mut properties = IndexMap::new();

    for name in schema.prop_names() {
        if name == CHILDREN {
            if !node.children().is_absent() {
                properties.insert(CHILDREN, PropertyRef::Children(node.children()));
            }
            continue;
        }
        if let Some(value) = node.property(name).filter(|v| !v.is_undefined()) {
            properties.insert(name.as_str(), PropertyRef::Value(value));
        }
    }

    for (name, value) in node.wildcard_properties() {
        if !value.is_undefined() && !properties.contains_key(name) {
            properties.insert(name, PropertyRef::Value(value));
        }
    }

    CanonicalForm {
        properties,
        type_name: node.type_name(),
        namespace: node.namespace(),
    }
}

/// Fully serialize `node` and everything below it into JSON.
pub fn to_json(node: &Node) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(node)
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(self).serialize(serializer)
    }
}

impl Serialize for Children {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Children::Absent => serializer.serialize_unit(),
            Children::Scalar(scalar) => scalar.serialize(serializer),
            Children::Node(node) => node.serialize(serializer),
            Children::List(items) => serializer.collect_seq(items),
        }
    }
}

impl Serialize for Child {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Child::Node(node) => node.serialize(serializer),
            Child::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ComponentSchema;
    use serde_json::json;
    use std::sync::Arc;

    fn schema(type_name: &str) -> Arc<ComponentSchema> {
        ComponentSchema::builder(type_name, "ns")
            .props(["children", "id", "foo", "bar"])
            .wildcard("data-")
            .build()
    }

    #[test]
    fn test_undefined_properties_are_omitted() {
        let node = Node::builder(schema("A"))
            .id("a")
            .prop("foo", Value::Undefined)
            .prop("bar", 1)
            .build()
            .unwrap();

        let canonical = serialize(&node);
        assert_eq!(canonical.type_name, "A");
        assert_eq!(canonical.namespace, "ns");
        assert_eq!(canonical.properties.keys().copied().collect::<Vec<_>>(), ["id", "bar"]);

        insta::assert_json_snapshot!(canonical, @r###"
        {
          "properties": {
            "id": "a",
            "bar": 1
          },
          "type": "A",
          "namespace": "ns"
        }
        "###);
    }

    #[test]
    fn test_explicit_null_is_kept() {
        let node = Node::builder(schema("A")).prop("foo", Value::Null).build().unwrap();
        assert_eq!(
            to_json(&node).unwrap(),
            json!({"properties": {"foo": null}, "type": "A", "namespace": "ns"})
        );
    }

    #[test]
    fn test_serialize_is_shallow() {
        let inner = Node::builder(schema("B")).id("b").build().unwrap();
        let outer = Node::builder(schema("A")).children(inner).build().unwrap();

        let canonical = serialize(&outer);
        let nested = canonical.properties["children"].as_node().unwrap();

        // The nested node is borrowed as-is, not converted.
        assert!(std::ptr::eq(nested, outer.children().as_node().unwrap()));
    }

    #[test]
    fn test_nested_nodes_serialize_recursively() {
        let c = Node::builder(schema("C")).id("c").build().unwrap();
        let b = Node::builder(schema("B")).id("b").children(vec![c]).build().unwrap();
        let root = Node::builder(schema("A"))
            .prop("data-role", "root")
            .children(vec![Child::from(b), Child::from("text")])
            .build()
            .unwrap();

        assert_eq!(
            to_json(&root).unwrap(),
            json!({
                "properties": {
                    "children": [
                        {
                            "properties": {
                                "children": [
                                    {"properties": {"id": "c"}, "type": "C", "namespace": "ns"}
                                ],
                                "id": "b"
                            },
                            "type": "B",
                            "namespace": "ns"
                        },
                        "text"
                    ],
                    "data-role": "root"
                },
                "type": "A",
                "namespace": "ns"
            })
        );
    }

    #[test]
    fn test_node_inside_property_value() {
        let label = Node::builder(schema("B")).children("label").build().unwrap();
        let node = Node::builder(schema("A")).prop("bar", label).build().unwrap();

        let json = to_json(&node).unwrap();
        assert_eq!(json["properties"]["bar"]["type"], "B");
        assert_eq!(json["properties"]["bar"]["properties"]["children"], "label");
    }
}
