//! Remote catalog integration
//!
//! Fetches flat folder/file record listings from the catalog service and
//! resolves their id-based parent linkage into a name-keyed tree. The diff
//! core never sees record ids, only full-path names.

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::tree::node::{LeafPayload, Tree, TreeBuilder};
use crate::tree::path;
use crate::types::NodeId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

/// Flat folder record as listed by the catalog service
#[derive(Debug, Clone, Deserialize)]
pub struct FolderRecord {
    pub id: u64,
    /// Missing for top-level folders
    pub parent_id: Option<u64>,
    pub name: String,
}

/// Flat file record as listed by the catalog service
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    pub id: u64,
    pub folder_id: u64,
    pub filename: String,
    pub url: Option<String>,
    pub size: Option<u64>,
    pub mime_class: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    fn payload(&self) -> LeafPayload {
        LeafPayload {
            url: self.url.clone(),
            size: self.size,
            mime_class: self.mime_class.clone(),
            created_at: self.created_at,
        }
    }
}

/// Build the source tree from flat catalog records
///
/// Folders whose parent id is absent from the record set become top-level
/// under the root; deeper folders are attached breadth-first by id. Names
/// become full paths during assembly (root name joined with each segment),
/// so identity matches the local tree's keys. Records that never link up
/// (id cycles, orphaned files) are dropped and reported via tracing.
#[instrument(skip_all, fields(folders = folders.len(), files = files.len()))]
pub fn assemble_tree(root_name: &str, folders: &[FolderRecord], files: &[FileRecord]) -> Tree {
    let known_ids: HashSet<u64> = folders.iter().map(|f| f.id).collect();

    let mut builder = TreeBuilder::new(root_name.to_string());
    let root = builder.root_id();

    // folder record id -> attached node id, filled in as rounds progress
    let mut attached: HashMap<u64, NodeId> = HashMap::new();

    let (mut frontier, mut pending): (Vec<&FolderRecord>, Vec<&FolderRecord>) =
        folders.iter().partition(|f| {
            f.parent_id.map_or(true, |pid| !known_ids.contains(&pid))
        });

    let mut parent_of_frontier: HashMap<u64, NodeId> =
        frontier.iter().map(|f| (f.id, root)).collect();

    while !frontier.is_empty() {
        let mut next_frontier = Vec::new();
        for folder in frontier {
            let parent_id = parent_of_frontier
                .get(&folder.id)
                .copied()
                .unwrap_or(root);
            let node_id = attach_folder(&mut builder, parent_id, &folder.name);
            attached.insert(folder.id, node_id);

            let (children, rest): (Vec<&FolderRecord>, Vec<&FolderRecord>) = pending
                .into_iter()
                .partition(|f| f.parent_id == Some(folder.id));
            pending = rest;
            for child in children {
                parent_of_frontier.insert(child.id, node_id);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    for orphan in pending {
        debug!(
            folder = orphan.name.as_str(),
            id = orphan.id,
            "Folder record never linked up, dropped"
        );
    }

    for file in files {
        match attached.get(&file.folder_id) {
            Some(&folder_node) => {
                attach_file(&mut builder, folder_node, file);
            }
            None => {
                debug!(
                    file = file.filename.as_str(),
                    folder_id = file.folder_id,
                    "File record has no attached folder, dropped"
                );
            }
        }
    }

    let tree = builder.finish();
    info!(node_count = tree.len(), "Catalog tree assembled");
    tree
}

/// Attach a folder, reusing an existing same-named sibling if the catalog
/// lists the name twice under one parent.
fn attach_folder(builder: &mut TreeBuilder, parent: NodeId, name: &str) -> NodeId {
    let full_name = path::join_name(builder.name_of(parent), name);
    if let Some(existing) = builder.child_by_name(parent, &full_name) {
        debug!(folder = full_name.as_str(), "Duplicate folder name, reusing node");
        return existing;
    }
    match builder.add_container(parent, full_name) {
        Ok(id) => id,
        // unreachable after the child_by_name check; keep the parent on any
        // inconsistency rather than dropping the subtree
        Err(_) => parent,
    }
}

fn attach_file(builder: &mut TreeBuilder, folder: NodeId, file: &FileRecord) {
    let full_name = path::join_name(builder.name_of(folder), &file.filename);
    if builder.child_by_name(folder, &full_name).is_some() {
        debug!(file = full_name.as_str(), "Duplicate filename, keeping first");
        return;
    }
    if builder
        .add_leaf(folder, full_name, Some(file.payload()))
        .is_err()
    {
        debug!(file = file.filename.as_str(), "File could not be attached");
    }
}

/// Apply the config's file filters to a record listing
///
/// Whitelisted filenames are always kept; blacklisted filenames are always
/// dropped; everything else passes the extension-class rules. Video and
/// link classes require their opt-in flags.
pub fn filter_files(config: &SyncConfig, files: Vec<FileRecord>) -> Vec<FileRecord> {
    files
        .into_iter()
        .filter(|file| {
            if config.file_white_list.iter().any(|w| w == &file.filename) {
                return true;
            }
            if config.file_black_list.iter().any(|b| b == &file.filename) {
                return false;
            }
            let class = file.mime_class.as_deref().unwrap_or("");
            if class == "video" && !config.allow_video {
                return false;
            }
            if class == "link" && !config.allow_link {
                return false;
            }
            let in_white = config
                .file_extension_white_list
                .iter()
                .any(|e| e == class);
            let in_black = config
                .file_extension_black_list
                .iter()
                .any(|e| e == class);
            in_white || !in_black
        })
        .collect()
}

/// HTTP client for the catalog service
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CatalogClient {
    /// Create a client for the given API base URL and bearer token.
    pub fn new(base_url: &str, token: &str) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SyncError::CatalogError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// List all folder records visible to the token.
    pub async fn list_folders(&self) -> Result<Vec<FolderRecord>, SyncError> {
        let url = format!("{}/folders", self.base_url);
        debug!(url = url.as_str(), "Listing catalog folders");
        let folders = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<FolderRecord>>()
            .await?;
        Ok(folders)
    }

    /// List all file records visible to the token.
    pub async fn list_files(&self) -> Result<Vec<FileRecord>, SyncError> {
        let url = format!("{}/files", self.base_url);
        debug!(url = url.as_str(), "Listing catalog files");
        let files = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<FileRecord>>()
            .await?;
        Ok(files)
    }

    /// Fetch a file's content from its payload URL.
    pub async fn fetch_file(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        let bytes = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}
