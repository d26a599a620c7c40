//! Tree reconstruction from a flat, merged node pool
//!
//! Rebuilds one coherent tree by breadth-first parent/child relinking over
//! parent names. Total: any input yields a well-formed tree; entries whose
//! parent never appears in the frontier are dropped and reported through
//! tracing only.

use crate::diff::merge::merge_containers;
use crate::diff::ContainerEntry;
use crate::tree::node::{ContainerNode, LeafNode, Node, Tree};
use crate::types::NodeId;
use tracing::debug;

/// Rebuild a single tree from merged container entries.
pub fn reconcile(entries: Vec<ContainerEntry>) -> Tree {
    let (root_candidates, mut others): (Vec<ContainerEntry>, Vec<ContainerEntry>) =
        entries.into_iter().partition(|e| e.parent.is_none());

    let mut merged_roots = merge_containers(root_candidates);

    let (mut tree, mut frontier) = match merged_roots.len() {
        // no root candidate at all: degenerate input, everything below is
        // unreachable from an empty anonymous root
        0 => (Tree::with_root(anonymous_root()), Vec::new()),
        1 => {
            let root_entry = merged_roots.remove(0);
            let mut tree = Tree::with_root(ContainerNode {
                name: root_entry.name.clone(),
                parent: None,
                children: Vec::new(),
                leaves: Vec::new(),
                tag: root_entry.tag,
            });
            let root = tree.root();
            attach_leaves(&mut tree, root, root_entry);
            (tree, vec![root])
        }
        // several distinct root identities survive merging: synthesize an
        // anonymous root and hang them all under it
        _ => {
            let mut tree = Tree::with_root(anonymous_root());
            let root = tree.root();
            let frontier = merged_roots
                .into_iter()
                .map(|entry| attach_entry(&mut tree, root, entry))
                .collect();
            (tree, frontier)
        }
    };

    // breadth-first relinking: each round claims every entry whose parent
    // name matches a frontier node
    while !others.is_empty() && !frontier.is_empty() {
        let mut next_frontier = Vec::new();
        for frontier_id in frontier {
            let frontier_name = tree.node(frontier_id).name().to_string();
            let (claimed, rest): (Vec<ContainerEntry>, Vec<ContainerEntry>) = others
                .into_iter()
                .partition(|e| e.parent.as_deref() == Some(frontier_name.as_str()));
            others = rest;
            for entry in claimed {
                next_frontier.push(attach_entry(&mut tree, frontier_id, entry));
            }
        }
        frontier = next_frontier;
    }

    for dropped in others {
        debug!(
            node = dropped.name.as_str(),
            parent = dropped.parent.as_deref().unwrap_or(""),
            "Unreachable node dropped during reconstruction"
        );
    }

    tree
}

fn anonymous_root() -> ContainerNode {
    ContainerNode {
        name: String::new(),
        parent: None,
        children: Vec::new(),
        leaves: Vec::new(),
        tag: false,
    }
}

/// Materialize an entry as a container under `parent`, leaves included.
fn attach_entry(tree: &mut Tree, parent: NodeId, entry: ContainerEntry) -> NodeId {
    let id = tree.push_node(Node::Container(ContainerNode {
        name: entry.name.clone(),
        parent: Some(parent),
        children: Vec::new(),
        leaves: Vec::new(),
        tag: entry.tag,
    }));
    if let Node::Container(p) = tree.node_mut(parent) {
        p.children.push(id);
    }
    attach_leaves(tree, id, entry);
    id
}

fn attach_leaves(tree: &mut Tree, container: NodeId, entry: ContainerEntry) {
    for leaf in entry.leaves {
        let leaf_id = tree.push_node(Node::Leaf(LeafNode {
            name: leaf.name,
            parent: Some(container),
            payload: leaf.payload,
            tag: leaf.tag,
        }));
        if let Node::Container(c) = tree.node_mut(container) {
            c.leaves.push(leaf_id);
        }
    }
}
