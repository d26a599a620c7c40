//! Materialization of a tagged diff tree
//!
//! Planning walks the tree and collects tagged containers (directories to
//! create) and tagged leaves with a payload URL (files to fetch). Execution
//! performs the filesystem and network work; the diff core itself never
//! touches either.

use crate::catalog::CatalogClient;
use crate::error::{StorageError, SyncError};
use crate::tree::node::{Node, Tree};
use crate::tree::visit;
use futures::future::join_all;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A single file to fetch and persist
#[derive(Debug, Clone, PartialEq)]
pub struct FetchItem {
    /// Full destination path (the leaf's identity key)
    pub path: String,
    pub url: String,
    pub size: Option<u64>,
    pub mime_class: Option<String>,
}

/// Work derived from a tagged tree
#[derive(Debug, Clone, Default)]
pub struct MaterializePlan {
    /// Tagged containers, parents before children
    pub directories: Vec<String>,
    /// Tagged leaves carrying a fetchable URL
    pub files: Vec<FetchItem>,
}

impl MaterializePlan {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

/// Outcome of one materialization run
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub directories_created: usize,
    pub files_fetched: usize,
    /// (path, reason) per failed fetch
    pub failures: Vec<(String, String)>,
}

/// Collect the work a tagged tree implies
///
/// Pre-order traversal guarantees parent directories appear before their
/// children. Tagged leaves without a URL (locally discovered files can't be
/// re-fetched) are skipped.
pub fn plan(tree: &Tree) -> MaterializePlan {
    let mut plan = MaterializePlan::default();

    for id in visit::preorder(tree) {
        match tree.node(id) {
            Node::Container(c) if c.tag => {
                // a synthesized anonymous root has no path on disk
                if !c.name.is_empty() {
                    plan.directories.push(c.name.clone());
                }
            }
            Node::Leaf(l) if l.tag => {
                match l.payload.as_ref().and_then(|p| p.url.clone()) {
                    Some(url) => plan.files.push(FetchItem {
                        path: l.name.clone(),
                        url,
                        size: l.payload.as_ref().and_then(|p| p.size),
                        mime_class: l.payload.as_ref().and_then(|p| p.mime_class.clone()),
                    }),
                    None => {
                        debug!(leaf = l.name.as_str(), "Tagged leaf has no URL, skipped")
                    }
                }
            }
            _ => {}
        }
    }
    plan
}

/// Enforce the per-file and total size limits on a plan.
pub fn apply_size_limits(
    mut plan: MaterializePlan,
    max_file_size: Option<u64>,
    max_total_size: Option<u64>,
) -> MaterializePlan {
    if let Some(limit) = max_file_size {
        plan.files.retain(|item| {
            let keep = item.size.map_or(true, |s| s <= limit);
            if !keep {
                warn!(path = item.path.as_str(), "File exceeds size limit, skipped");
            }
            keep
        });
    }
    if let Some(limit) = max_total_size {
        let mut total: u64 = 0;
        plan.files.retain(|item| {
            let size = item.size.unwrap_or(0);
            let keep = total.saturating_add(size) <= limit;
            if keep {
                // skipped files consume no budget, so later smaller files
                // can still fit
                total = total.saturating_add(size);
            } else {
                warn!(path = item.path.as_str(), "Total size limit reached, skipped");
            }
            keep
        });
    }
    plan
}

/// Execute a plan: create directories, then fetch all files concurrently
///
/// Individual fetch failures are recorded in the report rather than
/// aborting the run; directory creation failures are fatal.
#[instrument(skip_all, fields(directories = plan.directories.len(), files = plan.files.len()))]
pub async fn materialize(
    plan: &MaterializePlan,
    client: &CatalogClient,
) -> Result<MaterializeReport, SyncError> {
    let mut report = MaterializeReport::default();

    for dir in &plan.directories {
        info!(dir = dir.as_str(), "Creating directory");
        fs::create_dir_all(dir).map_err(StorageError::from)?;
        report.directories_created += 1;
    }

    let fetches = plan.files.iter().map(|item| async move {
        info!(
            path = item.path.as_str(),
            url = item.url.as_str(),
            size = item.size.unwrap_or(0),
            "Fetching file"
        );
        let bytes = client
            .fetch_file(&item.url)
            .await
            .map_err(|e| SyncError::FetchFailed {
                path: item.path.clone(),
                reason: e.to_string(),
            })?;
        if let Some(parent) = Path::new(&item.path).parent() {
            fs::create_dir_all(parent).map_err(StorageError::from)?;
        }
        fs::write(&item.path, &bytes).map_err(StorageError::from)?;
        Ok::<(), SyncError>(())
    });

    for (item, result) in plan.files.iter().zip(join_all(fetches).await) {
        match result {
            Ok(()) => report.files_fetched += 1,
            Err(e) => {
                warn!(path = item.path.as_str(), error = %e, "Fetch failed");
                report.failures.push((item.path.clone(), e.to_string()));
            }
        }
    }

    info!(
        directories = report.directories_created,
        fetched = report.files_fetched,
        failed = report.failures.len(),
        "Materialization finished"
    );
    Ok(report)
}
