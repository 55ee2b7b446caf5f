//! Depth-first traversal of a node's children.
//!
//! All iterators walk with an explicit stack, so deep trees do not recurse.
//! Order is pre-order, left-to-right over sequence children, and the root
//! itself is never yielded.

use std::iter::Enumerate;
use std::slice;

use dash_core::{Child, Children, Node, Scalar};
use smallvec::SmallVec;

/// Position of an entry inside its parent's children slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The slot holds a single node.
    Single,
    /// Index into a sequence slot.
    Index(usize),
}

/// Path from a root to one of its descendants, one slot per level.
pub type SlotPath = SmallVec<[Slot; 8]>;

/// An item reached by traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Node(&'a Node),
    Scalar(&'a Scalar),
}

impl<'a> Entry<'a> {
    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            Entry::Node(node) => Some(node),
            Entry::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&'a Scalar> {
        match self {
            Entry::Scalar(scalar) => Some(scalar),
            Entry::Node(_) => None,
        }
    }

    /// The entry's id; scalars and nodes without one give `None`.
    pub fn id(&self) -> Option<&'a str> {
        self.as_node().and_then(Node::id)
    }

    /// Type name shown in traversal paths.
    pub fn type_label(&self) -> &'a str {
        match self {
            Entry::Node(node) => node.type_name(),
            Entry::Scalar(scalar) => scalar.kind_name(),
        }
    }
}

/// Entries of one children slot.
enum SlotIter<'a> {
    Empty,
    Single(Option<&'a Node>),
    List(Enumerate<slice::Iter<'a, Child>>),
}

impl<'a> SlotIter<'a> {
    fn new(children: &'a Children) -> Self {
        match children {
            // A bare scalar slot is not an entry of its own.
            Children::Absent | Children::Scalar(_) => SlotIter::Empty,
            Children::Node(node) => SlotIter::Single(Some(node)),
            Children::List(items) => SlotIter::List(items.iter().enumerate()),
        }
    }
}

impl<'a> Iterator for SlotIter<'a> {
    type Item = (Slot, Entry<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SlotIter::Empty => None,
            SlotIter::Single(node) => node.take().map(|n| (Slot::Single, Entry::Node(n))),
            SlotIter::List(items) => items.next().map(|(i, child)| {
                let entry = match child {
                    Child::Node(node) => Entry::Node(node),
                    Child::Scalar(scalar) => Entry::Scalar(scalar),
                };
                (Slot::Index(i), entry)
            }),
        }
    }
}

/// Stack walker yielding `(depth, slot, entry)`; direct children have depth 0.
struct Walk<'a> {
    stack: Vec<SlotIter<'a>>,
}

impl<'a> Walk<'a> {
    fn new(root: &'a Node) -> Self {
        Self {
            stack: vec![SlotIter::new(root.children())],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, Slot, Entry<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let top = self.stack.last_mut()?;
            match top.next() {
                Some((slot, entry)) => {
                    if let Entry::Node(node) = entry {
                        self.stack.push(SlotIter::new(node.children()));
                    }
                    return Some((depth, slot, entry));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Iterator over every node and sequence scalar below a root.
pub struct Traverse<'a> {
    walk: Walk<'a>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|(_, _, entry)| entry)
    }
}

/// Like [`Traverse`], pairing each entry with a readable path.
///
/// Each level contributes `[i] Type (id=x)` for sequence entries or
/// `[*] Type (id=x)` for a single child; levels are joined by newlines.
/// Paths are for debugging only.
pub struct TraverseWithPaths<'a> {
    walk: Walk<'a>,
    labels: Vec<String>,
}

impl<'a> Iterator for TraverseWithPaths<'a> {
    type Item = (String, Entry<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, slot, entry) = self.walk.next()?;
        self.labels.truncate(depth);
        self.labels.push(label(slot, entry));
        Some((self.labels.join("\n"), entry))
    }
}

fn label(slot: Slot, entry: Entry<'_>) -> String {
    let marker = match slot {
        Slot::Single => "*".to_string(),
        Slot::Index(i) => i.to_string(),
    };
    let id = entry.id().map(|id| format!("(id={id})")).unwrap_or_default();
    format!("[{marker}] {} {id}", entry.type_label())
}

/// Iterator over the ids of nodes below a root, in traversal order.
pub struct Ids<'a> {
    traverse: Traverse<'a>,
}

impl<'a> Iterator for Ids<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.traverse.by_ref().find_map(|entry| entry.id())
    }
}

/// Every node and sequence scalar below `root`, depth-first pre-order.
pub fn traverse(root: &Node) -> Traverse<'_> {
    Traverse {
        walk: Walk::new(root),
    }
}

pub fn traverse_with_paths(root: &Node) -> TraverseWithPaths<'_> {
    TraverseWithPaths {
        walk: Walk::new(root),
        labels: Vec::new(),
    }
}

/// Ids of all descendant nodes that have one. Nodes without an id and
/// scalars are skipped.
pub fn ids(root: &Node) -> Ids<'_> {
    Ids {
        traverse: traverse(root),
    }
}

/// Number of entries below `root`.
///
/// Each entry of a children slot counts once, and each node entry adds the
/// count of its own children. A bare scalar slot counts as one, an absent
/// slot as zero.
pub fn count(root: &Node) -> usize {
    let mut total = 0;
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node.children() {
            Children::Absent => {}
            Children::Scalar(_) => total += 1,
            Children::Node(child) => {
                total += 1;
                stack.push(child);
            }
            Children::List(items) => {
                for item in items {
                    total += 1;
                    if let Child::Node(child) = item {
                        stack.push(child);
                    }
                }
            }
        }
    }

    total
}

/// Slot path of the first node (pre-order) whose id is `id`.
pub fn locate(root: &Node, id: &str) -> Option<SlotPath> {
    let mut path = SlotPath::new();
    for (depth, slot, entry) in Walk::new(root) {
        path.truncate(depth);
        path.push(slot);
        if entry.id() == Some(id) {
            return Some(path);
        }
    }
    None
}
