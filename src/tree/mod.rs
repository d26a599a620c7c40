//! Folder tree model
//!
//! Represents both the local store and the remote catalog as arena-backed
//! trees of containers and leaves, identified by full-path name strings.

pub mod builder;
pub mod node;
pub mod path;
pub mod visit;
pub mod walker;

pub use node::{ContainerNode, LeafNode, LeafPayload, Node, Tree, TreeBuilder};
