//! Error types for the treesync catalog mirroring system.

use std::path::PathBuf;
use thiserror::Error;

/// Tree construction errors
///
/// These surface from `TreeBuilder` when a caller assembles an invalid tree.
/// The diff/merge/reconcile operations themselves are total and never fail.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Duplicate child {name:?} under container {parent:?}")]
    DuplicateChild { parent: String, name: String },

    #[error("Node id {0:?} is not a container")]
    NotAContainer(crate::types::NodeId),
}

/// Storage-related errors (local walk, snapshots, materialization)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Snapshot codec error: {0}")]
    SnapshotCodec(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Top-level errors surfaced at the system boundary
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}. Generate one with `treesync template`.")]
    ConfigNotFound(PathBuf),

    #[error("Catalog request failed: {0}")]
    CatalogError(String),

    #[error("Fetch failed for {path}: {reason}")]
    FetchFailed { path: String, reason: String },

    #[error("Tree error: {0}")]
    TreeError(#[from] TreeError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::CatalogError(err.to_string())
    }
}
