//! Shared test utilities for integration tests

use std::path::Path;
use treesync::catalog::{FileRecord, FolderRecord};
use treesync::tree::node::Tree;
use treesync::tree::{path, visit};

pub fn folder(id: u64, parent_id: Option<u64>, name: &str) -> FolderRecord {
    FolderRecord {
        id,
        parent_id,
        name: name.to_string(),
    }
}

pub fn file(id: u64, folder_id: u64, filename: &str) -> FileRecord {
    FileRecord {
        id,
        folder_id,
        filename: filename.to_string(),
        url: Some(format!("https://catalog.example/files/{}", id)),
        size: Some(1024),
        mime_class: Some("pdf".to_string()),
        created_at: None,
    }
}

/// Root identity key for a local base directory, matching what both the
/// local tree builder and the catalog assembly use.
pub fn root_name(base: &Path) -> String {
    path::canonicalize_path(base)
        .unwrap()
        .to_string_lossy()
        .to_string()
}

/// Identity keys of all tagged nodes, in pre-order.
pub fn tagged_names(tree: &Tree) -> Vec<String> {
    visit::preorder(tree)
        .into_iter()
        .filter(|&id| tree.node(id).tag())
        .map(|id| tree.node(id).name().to_string())
        .collect()
}
