//! Diff engine
//!
//! Reconciles two independently built trees — the remote catalog (source)
//! and the local store (destination) — into one tree where `tag == true`
//! marks entities that exist only in the source. The engine is pure and
//! total: it never performs I/O and never fails.

pub mod merge;
pub mod partition;
pub mod reconcile;

use crate::tree::node::{LeafPayload, Tree};
use crate::tree::visit;
use partition::Identity;
use tracing::{debug, instrument};

/// Flattened leaf, detached from any arena
#[derive(Debug, Clone, PartialEq)]
pub struct LeafEntry {
    pub name: String,
    pub payload: Option<LeafPayload>,
    pub tag: bool,
}

/// Flattened container, detached from any arena
///
/// Carries its merged leaves but no child-container list; container
/// hierarchy is rebuilt from parent names by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerEntry {
    pub name: String,
    pub parent: Option<String>,
    pub tag: bool,
    pub leaves: Vec<LeafEntry>,
}

impl Identity for LeafEntry {
    fn identity(&self) -> &str {
        &self.name
    }
}

impl Identity for ContainerEntry {
    fn identity(&self) -> &str {
        &self.name
    }
}

/// Flatten a tree's containers into pool entries, leaves riding along.
pub fn flatten_containers(tree: &Tree) -> Vec<ContainerEntry> {
    visit::preorder(tree)
        .into_iter()
        .filter_map(|id| {
            let container = tree.node(id).as_container()?;
            let parent = container
                .parent
                .map(|pid| tree.node(pid).name().to_string());
            let leaves = container
                .leaves
                .iter()
                .filter_map(|&lid| tree.node(lid).as_leaf())
                .map(|leaf| LeafEntry {
                    name: leaf.name.clone(),
                    payload: leaf.payload.clone(),
                    tag: leaf.tag,
                })
                .collect();
            Some(ContainerEntry {
                name: container.name.clone(),
                parent,
                tag: container.tag,
                leaves,
            })
        })
        .collect()
}

/// Diff two trees
///
/// Every source node is tagged, both trees are flattened into one pool,
/// same-identity nodes are merged (tag survives only where no destination
/// counterpart exists) and a fresh tree is rebuilt from the merged pool.
/// Neither input is mutated.
#[instrument(skip_all, fields(source_nodes = source.len(), destination_nodes = destination.len()))]
pub fn diff(source: &Tree, destination: &Tree) -> Tree {
    let tagged_source = visit::visit(source, |_, node| node.set_tag(true));

    let mut pool = flatten_containers(&tagged_source);
    pool.extend(flatten_containers(destination));
    debug!(pool_size = pool.len(), "Collected container pool");

    let merged = merge::merge_containers(pool);
    debug!(merged_size = merged.len(), "Merged pool by identity");

    reconcile::reconcile(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::TreeBuilder;

    /// source = A -> [A/B -> files:[c]] in one builder expression
    fn source_tree() -> Tree {
        let mut builder = TreeBuilder::new("A");
        let root = builder.root_id();
        let b = builder.add_container(root, "A/B").unwrap();
        builder.add_leaf(b, "A/B/c", None).unwrap();
        builder.finish()
    }

    fn tag_of(tree: &Tree, name: &str) -> bool {
        tree.node(tree.find_by_name(name).unwrap()).tag()
    }

    #[test]
    fn test_diff_against_empty_destination_tags_everything() {
        let source = source_tree();
        let destination = Tree::with_root(crate::tree::node::ContainerNode {
            name: String::new(),
            parent: None,
            children: Vec::new(),
            leaves: Vec::new(),
            tag: false,
        });

        let result = diff(&source, &destination);
        assert!(tag_of(&result, "A"));
        assert!(tag_of(&result, "A/B"));
        assert!(tag_of(&result, "A/B/c"));
    }

    #[test]
    fn test_diff_new_file_is_tagged_duplicate_is_not() {
        let mut builder = TreeBuilder::new("A");
        let root = builder.root_id();
        let b = builder.add_container(root, "A/B").unwrap();
        builder.add_leaf(b, "A/B/c", None).unwrap();
        builder.add_leaf(b, "A/B/d", None).unwrap();
        let source = builder.finish();

        let destination = source_tree();

        let result = diff(&source, &destination);
        assert!(!tag_of(&result, "A"));
        assert!(!tag_of(&result, "A/B"));
        assert!(!tag_of(&result, "A/B/c"), "file present on both sides");
        assert!(tag_of(&result, "A/B/d"), "file present only in source");
    }

    #[test]
    fn test_diff_identical_trees_tags_nothing() {
        let mut builder = TreeBuilder::new("A");
        let root = builder.root_id();
        builder.add_container(root, "A/C").unwrap();
        let tree = builder.finish();

        let result = diff(&tree, &tree.clone());
        assert!(result.ids().all(|id| !result.node(id).tag()));
    }

    #[test]
    fn test_diff_does_not_mutate_inputs() {
        let source = source_tree();
        let destination = source_tree();

        let _ = diff(&source, &destination);

        assert!(source.ids().all(|id| !source.node(id).tag()));
        assert!(destination.ids().all(|id| !destination.node(id).tag()));
    }

    #[test]
    fn test_diff_result_shape_is_union() {
        let mut builder = TreeBuilder::new("A");
        let root = builder.root_id();
        builder.add_container(root, "A/only-remote").unwrap();
        let source = builder.finish();

        let mut builder = TreeBuilder::new("A");
        let root = builder.root_id();
        builder.add_container(root, "A/only-local").unwrap();
        let destination = builder.finish();

        let result = diff(&source, &destination);
        assert!(result.find_by_name("A/only-remote").is_some());
        assert!(result.find_by_name("A/only-local").is_some());
        assert!(tag_of(&result, "A/only-remote"));
        assert!(!tag_of(&result, "A/only-local"));
    }

    #[test]
    fn test_diff_repeated_runs_identical() {
        let source = source_tree();
        let destination = source_tree();

        let first = diff(&source, &destination);
        let second = diff(&source, &destination);

        let shape = |t: &Tree| -> Vec<(String, bool)> {
            visit::preorder(t)
                .iter()
                .map(|&id| (t.node(id).name().to_string(), t.node(id).tag()))
                .collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }
}
