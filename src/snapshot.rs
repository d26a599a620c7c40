//! Snapshot codec
//!
//! Persists merged trees as timestamped JSON files so a prior run's result
//! can serve as the destination input of a later run. The arena stores
//! parent/child links as ids, so a tree round-trips through plain serde
//! with no cycle handling.

use crate::error::StorageError;
use crate::tree::node::Tree;
use crate::tree::visit;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SNAPSHOT_SUFFIX: &str = "-snapshot.json";

/// Write a snapshot of the tree, returning the file path
///
/// Tags are cleared before writing. A snapshot records what is present
/// after a run; when a later run diffs against it as the destination, a
/// lingering tag would mark already-materialized entities as source-only
/// again (container merging ANDs tags, so a stale `true` survives).
pub fn write_snapshot(dir: &Path, tree: &Tree) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(dir)?;

    // colon-free timestamp: lexicographic order equals chronological order
    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f");
    let path = dir.join(format!("{}{}", stamp, SNAPSHOT_SUFFIX));

    let settled = visit::visit(tree, |_, node| node.set_tag(false));
    let json = serde_json::to_string_pretty(&settled)
        .map_err(|e| StorageError::SnapshotCodec(e.to_string()))?;
    fs::write(&path, json)?;

    info!(path = %path.display(), node_count = tree.len(), "Snapshot written");
    Ok(path)
}

/// List snapshot files in the directory, oldest first.
pub fn list_snapshots(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut snapshots: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().ends_with(SNAPSHOT_SUFFIX))
                .unwrap_or(false)
        })
        .collect();
    snapshots.sort();
    Ok(snapshots)
}

/// Load the newest snapshot, if any exists.
pub fn load_newest_snapshot(dir: &Path) -> Result<Option<Tree>, StorageError> {
    let newest = match list_snapshots(dir)?.pop() {
        Some(path) => path,
        None => {
            debug!(dir = %dir.display(), "No snapshot found");
            return Ok(None);
        }
    };

    let raw = fs::read_to_string(&newest)?;
    let tree: Tree = serde_json::from_str(&raw).map_err(|e| {
        StorageError::SnapshotCodec(format!("{}: {}", newest.display(), e))
    })?;

    debug!(path = %newest.display(), node_count = tree.len(), "Snapshot loaded");
    Ok(Some(tree))
}
