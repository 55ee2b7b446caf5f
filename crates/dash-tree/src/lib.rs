//! Navigation over Dash component trees.
//!
//! A tree is a root [`Node`](dash_core::Node) whose children slot owns its
//! descendants. This crate addresses descendants by their `id` property:
//!
//! - [`Navigator`]: `get`, `get_mut`, `set`, and `delete` by id
//! - [`traverse`](traverse::traverse): depth-first pre-order walk, with
//!   optional debug paths
//! - [`ids`](traverse::ids) and [`count`](traverse::count)
//!
//! # Example
//!
//! ```ignore
//! use dash_tree::Navigator;
//!
//! let mut nav = Navigator::new(&mut layout);
//! nav.get_mut("graph")?.set_property("figure", figure)?;
//! let removed = nav.delete("old-banner")?;
//! ```

mod navigator;
pub mod traverse;

pub use navigator::Navigator;
pub use traverse::{count, ids, locate, traverse, traverse_with_paths, Entry, Slot, SlotPath};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use dash_core::{Child, ComponentSchema, Node};

    pub fn schema(type_name: &str) -> Arc<ComponentSchema> {
        ComponentSchema::builder(type_name, "test_components")
            .props(["children", "id", "title"])
            .build()
    }

    /// A node with an optional id; an empty `children` list leaves the slot absent.
    pub fn component(type_name: &str, id: Option<&str>, children: Vec<Child>) -> Node {
        let mut builder = Node::builder(schema(type_name));
        if let Some(id) = id {
            builder = builder.id(id);
        }
        if !children.is_empty() {
            builder = builder.children(children);
        }
        match builder.build() {
            Ok(node) => node,
            Err(err) => panic!("test component failed to build: {err}"),
        }
    }

    /// `[A(id=a), "text", B(id=b, children=[C(id=c)])]`
    pub fn scenario() -> Node {
        let c = component("C", Some("c"), vec![]);
        let b = component("B", Some("b"), vec![c.into()]);
        let a = component("A", Some("a"), vec![]);
        component("Div", None, vec![a.into(), Child::from("text"), b.into()])
    }
}
