//! Property tests for id-addressed access over generated trees.

use std::sync::Arc;

use dash_core::{to_json, Child, Children, ComponentSchema, Node};
use dash_tree::{count, ids, traverse, Navigator};
use proptest::prelude::*;
use proptest::sample::Index;

/// Shape of a generated children slot.
#[derive(Debug, Clone)]
enum Kids {
    None,
    Text,
    One(Box<Shape>),
    Many(Vec<Shape>),
}

#[derive(Debug, Clone)]
enum Shape {
    Text,
    Node { has_id: bool, kids: Kids },
}

fn arb_kids() -> impl Strategy<Value = Kids> {
    let leaf = prop_oneof![Just(Kids::None), Just(Kids::Text)];
    leaf.prop_recursive(5, 64, 5, |inner| {
        let node = (any::<bool>(), inner).prop_map(|(has_id, kids)| Shape::Node { has_id, kids });
        prop_oneof![
            node.clone().prop_map(|s| Kids::One(Box::new(s))),
            prop::collection::vec(prop_oneof![Just(Shape::Text), node], 0..5).prop_map(Kids::Many),
        ]
    })
}

fn schema() -> Arc<ComponentSchema> {
    ComponentSchema::builder("Div", "test_components")
        .props(["children", "id"])
        .build()
}

/// Builds the tree, numbering ids in pre-order so every id is unique.
fn build(kids: &Kids, id: Option<String>, schema: &Arc<ComponentSchema>, next: &mut usize) -> Node {
    let mut node = Node::new(schema.clone());
    if let Some(id) = id {
        node.set_property("id", id).unwrap();
    }

    let make = |shape: &Shape, next: &mut usize| -> Child {
        match shape {
            Shape::Text => Child::from("text"),
            Shape::Node { has_id, kids } => {
                let id = has_id.then(|| {
                    *next += 1;
                    format!("n{next}")
                });
                build(kids, id, schema, next).into()
            }
        }
    };

    let children = match kids {
        Kids::None => Children::Absent,
        Kids::Text => Children::from("text"),
        Kids::One(shape) => match make(shape, next) {
            Child::Node(child) => child.into(),
            Child::Scalar(s) => s.into(),
        },
        Kids::Many(shapes) => Children::List(shapes.iter().map(|s| make(s, next)).collect()),
    };
    node.set_children(children);
    node
}

fn arb_tree() -> impl Strategy<Value = Node> {
    arb_kids().prop_map(|kids| {
        let schema = schema();
        let mut next = 0;
        build(&kids, Some("root".into()), &schema, &mut next)
    })
}

/// The entry count rule written recursively.
fn reference_count(node: &Node) -> usize {
    match node.children() {
        Children::Absent => 0,
        Children::Scalar(_) => 1,
        Children::Node(child) => 1 + reference_count(child),
        Children::List(items) => items
            .iter()
            .map(|item| 1 + item.as_node().map_or(0, reference_count))
            .sum(),
    }
}

fn replacement(id: &str) -> Node {
    let mut node = Node::new(
        ComponentSchema::builder("Replacement", "test_components")
            .props(["children", "id"])
            .build(),
    );
    node.set_property("id", id).unwrap();
    node
}

proptest! {
    #[test]
    fn get_finds_every_id(root in arb_tree()) {
        let nav = Navigator::new(&root);
        for id in nav.ids() {
            prop_assert_eq!(nav.get(id).unwrap().id(), Some(id));
        }
    }

    #[test]
    fn missing_id_is_not_found(mut root in arb_tree()) {
        let before = root.clone();
        let mut nav = Navigator::new(&mut root);
        prop_assert!(nav.get("missing").unwrap_err().is_not_found());
        prop_assert!(nav.set("missing", replacement("x")).unwrap_err().is_not_found());
        prop_assert!(nav.delete("missing").unwrap_err().is_not_found());
        prop_assert_eq!(root, before);
    }

    #[test]
    fn ids_follow_traversal(root in arb_tree()) {
        let expected: Vec<&str> = traverse(&root).filter_map(|e| e.id()).collect();
        prop_assert_eq!(ids(&root).collect::<Vec<_>>(), expected);
        prop_assert!(!ids(&root).any(|id| id == "root"));
    }

    #[test]
    fn count_matches_rule(root in arb_tree()) {
        prop_assert_eq!(count(&root), reference_count(&root));
        prop_assert_eq!(Navigator::new(&root).len(), reference_count(&root));
    }

    #[test]
    fn delete_then_get_fails(mut root in arb_tree(), pick in any::<Index>()) {
        let all: Vec<String> = ids(&root).map(str::to_string).collect();
        prop_assume!(!all.is_empty());
        let target = pick.get(&all).clone();

        let mut nav = Navigator::new(&mut root);
        let before = nav.len();
        let removed = nav.delete(&target).unwrap();

        prop_assert_eq!(removed.id(), Some(target.as_str()));
        prop_assert!(nav.get(&target).unwrap_err().is_not_found());
        prop_assert_eq!(nav.len(), before - 1 - count(&removed));
    }

    #[test]
    fn set_then_get_returns_replacement(mut root in arb_tree(), pick in any::<Index>()) {
        let all: Vec<String> = ids(&root).map(str::to_string).collect();
        prop_assume!(!all.is_empty());
        let target = pick.get(&all).clone();

        let mut nav = Navigator::new(&mut root);
        nav.set(&target, replacement(&target)).unwrap();
        prop_assert_eq!(nav.get(&target).unwrap().type_name(), "Replacement");

        nav.set(&target, replacement("renamed")).unwrap();
        prop_assert!(nav.get(&target).unwrap_err().is_not_found());
        prop_assert!(nav.get("renamed").is_ok());
    }

    #[test]
    fn serialized_tree_reflects_mutation(mut root in arb_tree(), pick in any::<Index>()) {
        let all: Vec<String> = ids(&root).map(str::to_string).collect();
        prop_assume!(!all.is_empty());
        let target = pick.get(&all).clone();

        Navigator::new(&mut root).delete(&target).unwrap();
        let json = to_json(&root).unwrap().to_string();
        let needle = format!("\"id\":\"{target}\"");
        prop_assert!(!json.contains(&needle));
    }
}
