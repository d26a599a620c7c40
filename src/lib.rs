//! Treesync: New-File-Only Catalog Mirroring
//!
//! Mirrors a remote folder/file catalog into a local directory tree by
//! diffing two identity-keyed trees and materializing only the entities
//! missing locally. The diff core is pure; catalog access, the local walk,
//! snapshots and materialization live at the edges.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod healthcheck;
pub mod logging;
pub mod materialize;
pub mod snapshot;
pub mod tree;
pub mod types;
