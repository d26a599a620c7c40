//! Core types for the treesync reconciliation engine.

use serde::{Deserialize, Serialize};

/// NodeId: stable index of a node within a tree arena.
///
/// Parent and child links are stored as NodeIds rather than live references,
/// so trees contain no ownership cycles and serialize directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Index into the arena's node storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
