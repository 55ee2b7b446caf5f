//! Resource extraction from a layout.

use dash_core::Node;
use dash_tree::{traverse, Entry};
use indexmap::IndexSet;
use tracing::debug;

use crate::registry::{ComponentRegistry, ResourceDescriptor, ResourceKind};

/// Collect the `kind` resources of every namespace used in the tree under
/// `root`, the root included.
///
/// Namespaces contribute in the order they are first met during a
/// depth-first pre-order walk, and each contributes at most once no matter
/// how many of its components appear. Entries are tagged with their
/// namespace. Namespaces without a registered suite contribute nothing.
pub fn extract_resources(
    root: &Node,
    registry: &ComponentRegistry,
    kind: ResourceKind,
) -> Vec<ResourceDescriptor> {
    let mut seen = IndexSet::new();
    let mut resources = Vec::new();

    let nodes = std::iter::once(root).chain(traverse(root).filter_map(|e: Entry<'_>| e.as_node()));
    for node in nodes {
        if !seen.insert(node.namespace()) {
            continue;
        }
        let Some(suite) = registry.get(node.namespace()) else {
            continue;
        };

        let before = resources.len();
        resources.extend(suite.tagged_resources(kind));
        debug!(
            namespace = node.namespace(),
            list = kind.attribute_name(),
            count = resources.len() - before,
            "Collected component resources"
        );
    }

    resources
}
