//! Container and leaf node model, stored in an arena-backed tree
//!
//! Parent/child links are `NodeId` indices into the owning `Tree`, so the
//! structure has no reference cycles and serializes with plain serde.

use crate::error::TreeError;
use crate::types::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source-specific metadata carried by a leaf (remote URL, size, etc.)
///
/// Locally built trees have no payload; catalog trees and snapshots do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeafPayload {
    pub url: Option<String>,
    pub size: Option<u64>,
    pub mime_class: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Folder-equivalent node owning child containers and leaves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerNode {
    /// Full-path name, the identity key
    pub name: String,
    /// None only for the root
    pub parent: Option<NodeId>,
    /// Child containers, in insertion order
    pub children: Vec<NodeId>,
    /// Leaves, in insertion order
    pub leaves: Vec<NodeId>,
    /// Present in source, absent in destination
    #[serde(default)]
    pub tag: bool,
}

/// File-equivalent terminal node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafNode {
    /// Full-path name, the identity key
    pub name: String,
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub payload: Option<LeafPayload>,
    #[serde(default)]
    pub tag: bool,
}

/// Tree node variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Container(ContainerNode),
    Leaf(LeafNode),
}

impl Node {
    /// Identity key of the node.
    pub fn name(&self) -> &str {
        match self {
            Node::Container(c) => &c.name,
            Node::Leaf(l) => &l.name,
        }
    }

    /// Parent link; None only for a root.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Container(c) => c.parent,
            Node::Leaf(l) => l.parent,
        }
    }

    pub fn tag(&self) -> bool {
        match self {
            Node::Container(c) => c.tag,
            Node::Leaf(l) => l.tag,
        }
    }

    pub fn set_tag(&mut self, tag: bool) {
        match self {
            Node::Container(c) => c.tag = tag,
            Node::Leaf(l) => l.tag = tag,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            Node::Container(c) => Some(c),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Node::Container(_) => None,
            Node::Leaf(l) => Some(l),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }
}

/// Arena-backed tree of containers and leaves
///
/// The root is always a container. Every NodeId handed out by a tree is
/// valid for that tree only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding a single root container.
    pub(crate) fn with_root(mut root: ContainerNode) -> Self {
        root.parent = None;
        Self {
            nodes: vec![Node::Container(root)],
            root: NodeId(0),
        }
    }

    /// Append a node to the arena without linking it. Callers are
    /// responsible for wiring parent/child ids consistently.
    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids, in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Find a node by its identity key.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.ids().find(|id| self.node(*id).name() == name)
    }
}

/// Validating tree builder
///
/// External tree builders (local walk, catalog assembly) construct trees
/// through this type. A node is only reachable from the finished tree once
/// its parent link and sibling-uniqueness invariants hold, so no partially
/// constructed node ever escapes.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Tree,
}

impl TreeBuilder {
    /// Start a tree with the given root container name.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            tree: Tree::with_root(ContainerNode {
                name: root_name.into(),
                parent: None,
                children: Vec::new(),
                leaves: Vec::new(),
                tag: false,
            }),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root()
    }

    /// Add a container under `parent`.
    pub fn add_container(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        self.check_unique(parent, &name)?;
        let id = self.tree.push_node(Node::Container(ContainerNode {
            name,
            parent: Some(parent),
            children: Vec::new(),
            leaves: Vec::new(),
            tag: false,
        }));
        match self.tree.node_mut(parent) {
            Node::Container(c) => c.children.push(id),
            Node::Leaf(_) => return Err(TreeError::NotAContainer(parent)),
        }
        Ok(id)
    }

    /// Add a leaf under `parent`.
    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        payload: Option<LeafPayload>,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        self.check_unique(parent, &name)?;
        let id = self.tree.push_node(Node::Leaf(LeafNode {
            name,
            parent: Some(parent),
            payload,
            tag: false,
        }));
        match self.tree.node_mut(parent) {
            Node::Container(c) => c.leaves.push(id),
            Node::Leaf(_) => return Err(TreeError::NotAContainer(parent)),
        }
        Ok(id)
    }

    /// Identity key of an already-inserted node.
    pub fn name_of(&self, id: NodeId) -> &str {
        self.tree.node(id).name()
    }

    /// Child (container or leaf) of `parent` with the given identity key.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let container = self.tree.node(parent).as_container()?;
        container
            .children
            .iter()
            .chain(container.leaves.iter())
            .copied()
            .find(|&id| self.tree.node(id).name() == name)
    }

    /// Finish construction. All invariants were checked on insertion.
    pub fn finish(self) -> Tree {
        self.tree
    }

    fn check_unique(&self, parent: NodeId, name: &str) -> Result<(), TreeError> {
        let container = match self.tree.node(parent) {
            Node::Container(c) => c,
            Node::Leaf(_) => return Err(TreeError::NotAContainer(parent)),
        };
        let clash = container
            .children
            .iter()
            .chain(container.leaves.iter())
            .any(|id| self.tree.node(*id).name() == name);
        if clash {
            return Err(TreeError::DuplicateChild {
                parent: container.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}
