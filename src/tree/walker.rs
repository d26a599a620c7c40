//! Filesystem walker for enumerating the destination store

use crate::error::StorageError;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

/// Filesystem entry types
#[derive(Debug, Clone)]
pub enum Entry {
    /// A file entry with its path and size
    File { path: PathBuf, size: u64 },
    /// A directory entry with its path
    Directory { path: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &PathBuf {
        match self {
            Entry::File { path, .. } | Entry::Directory { path } => path,
        }
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false for determinism)
    pub follow_symlinks: bool,
    /// Directory or file names to skip entirely
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_patterns: vec![".git".to_string(), ".snapshot".to_string()],
            max_depth: None,
        }
    }
}

/// Filesystem walker
///
/// Enumerates the local store under a base directory. Entries come back
/// sorted by path so tree construction is deterministic across runs.
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given base path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the base directory and collect all entries, sorted by path.
    pub fn walk(&self) -> Result<Vec<Entry>, StorageError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        for entry in walker {
            let entry = entry.map_err(|e| {
                StorageError::InvalidPath(format!("Failed to walk directory: {}", e))
            })?;

            if self.should_ignore(&entry) {
                continue;
            }

            let path = entry.path().to_path_buf();

            // the base directory itself becomes the tree root, not an entry
            if path == self.root {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                StorageError::InvalidPath(format!(
                    "Failed to read metadata for {:?}: {}",
                    path, e
                ))
            })?;

            if metadata.is_file() {
                entries.push(Entry::File {
                    path,
                    size: metadata.len(),
                });
            } else if metadata.is_dir() {
                entries.push(Entry::Directory { path });
            }
            // symlinks fall through when not followed
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(entries)
    }

    /// Check if an entry matches an ignore pattern
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        for component in entry.path().components() {
            if let std::path::Component::Normal(name) = component {
                let name = name.to_string_lossy();
                if self
                    .config
                    .ignore_patterns
                    .iter()
                    .any(|p| p.as_str() == name)
                {
                    return true;
                }
            }
        }
        false
    }
}
