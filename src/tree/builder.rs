//! Destination tree builder
//!
//! Turns a walk of the local store into an arena tree whose node names are
//! full-path identity keys. No content inspection happens here; identity is
//! by path string alone.

use crate::error::StorageError;
use crate::tree::node::{Tree, TreeBuilder};
use crate::tree::path;
use crate::tree::walker::{Entry, Walker, WalkerConfig};
use crate::types::NodeId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Builds the destination tree from the local base directory
pub struct LocalTreeBuilder {
    root: PathBuf,
    walker_config: Option<WalkerConfig>,
}

impl LocalTreeBuilder {
    /// Create a builder for the given base directory
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            walker_config: None,
        }
    }

    /// Set walker config (ignore patterns, symlink handling, depth).
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = Some(config);
        self
    }

    /// Build the destination tree
    ///
    /// Directories sort before their contents, so a single top-down pass can
    /// link every entry to an already-inserted parent.
    #[instrument(skip(self), fields(base = %self.root.display()))]
    pub fn build(&self) -> Result<Tree, StorageError> {
        let start = Instant::now();

        let root_name = path::canonicalize_path(&self.root)?
            .to_string_lossy()
            .to_string();

        let walker = match &self.walker_config {
            Some(config) => Walker::with_config(self.root.clone(), config.clone()),
            None => Walker::new(self.root.clone()),
        };
        let entries = walker.walk()?;
        debug!(entry_count = entries.len(), "Walked base directory");

        let mut builder = TreeBuilder::new(root_name.clone());
        let mut dir_ids: HashMap<String, NodeId> = HashMap::new();
        dir_ids.insert(root_name.clone(), builder.root_id());

        for entry in entries {
            let name = match self.identity_of(&root_name, entry.path()) {
                Some(name) => name,
                None => {
                    debug!(path = %entry.path().display(), "Entry outside base, skipped");
                    continue;
                }
            };
            let parent_id = match name.rsplit_once('/') {
                Some((parent_name, _)) => dir_ids
                    .get(parent_name)
                    .copied()
                    .unwrap_or_else(|| builder.root_id()),
                None => builder.root_id(),
            };

            match entry {
                Entry::Directory { .. } => {
                    let id = builder
                        .add_container(parent_id, name.clone())
                        .map_err(|e| StorageError::InvalidPath(e.to_string()))?;
                    dir_ids.insert(name, id);
                }
                Entry::File { .. } => {
                    builder
                        .add_leaf(parent_id, name, None)
                        .map_err(|e| StorageError::InvalidPath(e.to_string()))?;
                }
            }
        }

        let tree = builder.finish();
        info!(
            node_count = tree.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Local tree build completed"
        );
        Ok(tree)
    }

    /// Identity key of a walked path: root name joined with the relative
    /// path, normalized with forward slashes.
    fn identity_of(&self, root_name: &str, walked: &Path) -> Option<String> {
        let rel = walked.strip_prefix(&self.root).ok()?;
        let rel: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        if rel.is_empty() {
            return None;
        }
        Some(path::join_name(root_name, &rel.join("/")))
    }
}
