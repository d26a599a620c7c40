//! Node merging
//!
//! Collapses same-identity pool entries into one canonical entry per name.
//! All ambiguity is absorbed here: disagreeing parents resolve to none,
//! duplicate leaves lose their tag. Merging never fails.

use crate::diff::partition::partition;
use crate::diff::{ContainerEntry, LeafEntry};
use tracing::debug;

/// Merge a flat pool of container entries, one result per distinct identity
///
/// Entries spanning several identities are split by the partitioner first
/// and each group is merged independently.
pub fn merge_containers(pool: Vec<ContainerEntry>) -> Vec<ContainerEntry> {
    partition(pool)
        .into_iter()
        .map(|(name, group)| merge_group(name, group))
        .collect()
}

/// Merge one same-identity group into its canonical entry.
fn merge_group(name: String, group: Vec<ContainerEntry>) -> ContainerEntry {
    let parent = resolve_parent(&name, &group);
    // an instance without a tag counts as false
    let tag = group.iter().all(|e| e.tag);
    let leaves = merge_leaves(group.into_iter().flat_map(|e| e.leaves).collect());
    ContainerEntry {
        name,
        parent,
        tag,
        leaves,
    }
}

/// Parent identity shared by all instances, or none on disagreement.
fn resolve_parent(name: &str, group: &[ContainerEntry]) -> Option<String> {
    let first = group.first().and_then(|e| e.parent.clone());
    for entry in group.iter().skip(1) {
        if entry.parent != first {
            debug!(
                node = name,
                "Merge candidates disagree on parent, resolving to none"
            );
            return None;
        }
    }
    first
}

/// Merge leaves of same-identity containers
///
/// A filename present in more than one instance is a duplicate: it already
/// exists on the other side, so its tag is forced off. A filename present
/// exactly once keeps its tag. Field resolution is last-instance-wins.
pub fn merge_leaves(leaves: Vec<LeafEntry>) -> Vec<LeafEntry> {
    partition(leaves)
        .into_iter()
        .filter_map(|(name, mut group)| {
            let duplicate = group.len() > 1;
            let mut merged = group.pop()?;
            if duplicate {
                debug!(leaf = name.as_str(), "Duplicate leaf, tag removed");
                merged.tag = false;
            }
            Some(merged)
        })
        .collect()
}
