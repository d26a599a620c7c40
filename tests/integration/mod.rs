//! Integration tests for the treesync catalog mirroring system

mod catalog_assembly;
mod local_tree;
mod snapshot_flow;
mod sync_pipeline;
mod test_utils;
