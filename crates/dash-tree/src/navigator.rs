//! Id-addressed access to a component tree.

use std::ops::{Deref, DerefMut};

use dash_core::{Child, Children, Node, Result, TreeError};
use tracing::{debug, trace};

use crate::traverse::{self, Ids, Slot, Traverse, TraverseWithPaths};

/// Looks up, replaces, and removes descendants of a root node by `id`.
///
/// The navigator works on any handle to a root: `&Node` for reads, or
/// `&mut Node` (or an owned `Box<Node>`) for mutation as well. The root
/// itself is never matched. With duplicate ids the first node in
/// depth-first pre-order wins.
#[derive(Debug, Clone)]
pub struct Navigator<T> {
    root: T,
}

impl<T> Navigator<T> {
    pub fn new(root: T) -> Self {
        Self { root }
    }

    pub fn into_inner(self) -> T {
        self.root
    }
}

impl<T: Deref<Target = Node>> Navigator<T> {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Find the first descendant whose id is `id`.
    pub fn get(&self, id: &str) -> Result<&Node> {
        traverse::traverse(&self.root)
            .filter_map(|entry| entry.as_node())
            .find(|node| node.id() == Some(id))
            .ok_or_else(|| not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_ok()
    }

    pub fn traverse(&self) -> Traverse<'_> {
        traverse::traverse(&self.root)
    }

    pub fn traverse_with_paths(&self) -> TraverseWithPaths<'_> {
        traverse::traverse_with_paths(&self.root)
    }

    /// Ids of all descendants that have one, in traversal order.
    pub fn ids(&self) -> Ids<'_> {
        traverse::ids(&self.root)
    }

    /// Entry count, see [`traverse::count`].
    pub fn len(&self) -> usize {
        traverse::count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: DerefMut<Target = Node>> Navigator<T> {
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Mutable access to the first descendant whose id is `id`.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut Node> {
        let path = traverse::locate(&self.root, id).ok_or_else(|| not_found(id))?;
        path.iter()
            .try_fold(&mut *self.root, |node, slot| child_mut(node, *slot))
    }

    /// Replace the matched node with `node`, returning the old one.
    ///
    /// The replacement is not searched. If its id differs from `id`, the
    /// slot is no longer reachable under `id`.
    pub fn set(&mut self, id: &str, node: Node) -> Result<Node> {
        let (parent, slot) = self.parent_of(id)?;

        let replaced = match (slot, parent.children_mut()) {
            (Slot::Single, Children::Node(current)) => std::mem::replace(current.as_mut(), node),
            (Slot::Index(i), Children::List(items)) => match items.get_mut(i) {
                Some(Child::Node(current)) => std::mem::replace(current, node),
                _ => return Err(stale_slot(id)),
            },
            _ => return Err(stale_slot(id)),
        };

        debug!(id, replaced = replaced.type_name(), "Replaced component");
        Ok(replaced)
    }

    /// Remove the matched node, returning it.
    ///
    /// A single-child slot becomes absent; a sequence entry is removed and
    /// later entries shift down.
    pub fn delete(&mut self, id: &str) -> Result<Node> {
        let (parent, slot) = self.parent_of(id)?;

        let removed = match slot {
            Slot::Single => match parent.take_children() {
                Children::Node(old) => *old,
                other => {
                    parent.set_children(other);
                    return Err(stale_slot(id));
                }
            },
            Slot::Index(i) => {
                let Children::List(items) = parent.children_mut() else {
                    return Err(stale_slot(id));
                };
                if items.get(i).and_then(Child::as_node).is_none() {
                    return Err(stale_slot(id));
                }
                match items.remove(i) {
                    Child::Node(old) => old,
                    Child::Scalar(_) => return Err(stale_slot(id)),
                }
            }
        };

        debug!(id, removed = removed.type_name(), "Deleted component");
        Ok(removed)
    }

    /// Parent of the matched node and the slot it occupies.
    fn parent_of(&mut self, id: &str) -> Result<(&mut Node, Slot)> {
        let path = traverse::locate(&self.root, id).ok_or_else(|| not_found(id))?;
        let (last, ancestors) = path.split_last().ok_or_else(|| not_found(id))?;
        let parent = ancestors
            .iter()
            .try_fold(&mut *self.root, |node, slot| child_mut(node, *slot))?;
        Ok((parent, *last))
    }
}

fn child_mut(node: &mut Node, slot: Slot) -> Result<&mut Node> {
    match (node.children_mut(), slot) {
        (Children::Node(child), Slot::Single) => Ok(child),
        (Children::List(items), Slot::Index(i)) => items
            .get_mut(i)
            .and_then(Child::as_node_mut)
            .ok_or_else(|| TreeError::invalid_structure(format!("no component at index {i}"))),
        _ => Err(TreeError::invalid_structure(
            "children slot does not match the located path",
        )),
    }
}

fn not_found(id: &str) -> TreeError {
    trace!(id, "Component id not found");
    TreeError::not_found(id)
}

fn stale_slot(id: &str) -> TreeError {
    TreeError::invalid_structure(format!("slot located for '{id}' changed shape"))
}
