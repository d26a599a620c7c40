//! Cycle-safe tree visitor
//!
//! Walks every reachable node in pre-order (a node before its descendants,
//! child containers before leaves, left to right). The visitor owns its
//! visited set for the duration of one call, so trees carry no traversal
//! scratch state and repeated calls behave identically with no reset pass.

use crate::tree::node::{Node, Tree};
use crate::types::NodeId;
use std::collections::HashSet;

/// Visit every reachable node, mutating the tree in place
///
/// The callback runs when a node is first entered and may mutate its tag or
/// other fields. A node already entered through another edge is skipped, so
/// traversal terminates even on arenas with duplicate or back edges.
pub fn visit_mut<F>(tree: &mut Tree, mut f: F)
where
    F: FnMut(NodeId, &mut Node),
{
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(tree.len());
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        f(id, tree.node_mut(id));

        // children are read after the callback ran, as the entry order demands
        if let Node::Container(c) = tree.node(id) {
            for &leaf in c.leaves.iter().rev() {
                if !visited.contains(&leaf) {
                    stack.push(leaf);
                }
            }
            for &child in c.children.iter().rev() {
                if !visited.contains(&child) {
                    stack.push(child);
                }
            }
        }
    }
}

/// Copy-on-visit mode: clone the tree, visit the clone, leave the original
/// untouched.
pub fn visit<F>(tree: &Tree, f: F) -> Tree
where
    F: FnMut(NodeId, &mut Node),
{
    let mut copy = tree.clone();
    visit_mut(&mut copy, f);
    copy
}

/// Pre-order id sequence of all reachable nodes, without a callback.
pub fn preorder(tree: &Tree) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(tree.len());
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(tree.len());
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        order.push(id);
        if let Node::Container(c) = tree.node(id) {
            for &leaf in c.leaves.iter().rev() {
                if !visited.contains(&leaf) {
                    stack.push(leaf);
                }
            }
            for &child in c.children.iter().rev() {
                if !visited.contains(&child) {
                    stack.push(child);
                }
            }
        }
    }
    order
}
