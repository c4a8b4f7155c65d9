use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use super::node::{Node, NodeId, NodeKind};
use super::policy::TreePolicy;

pub const DEFAULT_ROOT_NAME: &str = "root";

/// An in-memory directory tree.
///
/// Nodes live in an arena of slots addressed by [`NodeId`]. Every attached
/// node is listed in exactly one parent's `children` and points back to that
/// parent; the root has no parent and is nobody's child. Destroyed nodes leave
/// an empty slot behind that is never handed out again.
#[derive(Debug, Clone)]
pub struct FileTree {
    slots: Vec<Option<Node>>,
    root: NodeId,
    live: usize,
    policy: TreePolicy,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

impl FileTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Node::new(root_name.into(), NodeKind::Directory);
        Self {
            slots: vec![Some(root)],
            root: NodeId(0),
            live: 1,
            policy: TreePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TreePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TreePolicy {
        self.policy
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not, including the root.
    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).context(NodeNotFoundSnafu {
            target: id.to_string(),
        })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .context(NodeNotFoundSnafu {
                target: id.to_string(),
            })
    }

    pub fn name(&self, id: NodeId) -> Result<&str, TreeError> {
        self.node(id).map(Node::name)
    }

    pub fn kind(&self, id: NodeId) -> Result<NodeKind, TreeError> {
        self.node(id).map(Node::kind)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.node(id).map(Node::parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        self.node(id).map(Node::children)
    }

    /// True when `id` is `ancestor` itself or lies somewhere below it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.get(node_id).and_then(Node::parent);
        }
        false
    }

    /// Allocates a node that is not attached anywhere yet.
    pub fn create_node(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        let name = name.into();
        ensure!(!name.is_empty(), InvalidArgumentSnafu);

        let id = NodeId(self.slots.len());
        self.slots.push(Some(Node::new(name, kind)));
        self.live += 1;
        Ok(id)
    }

    pub fn create_directory(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.create_child(parent, name.into(), NodeKind::Directory)
    }

    pub fn create_file(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.create_child(parent, name.into(), NodeKind::File)
    }

    fn create_child(
        &mut self,
        parent: NodeId,
        name: String,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        self.ensure_directory(parent)?;
        let id = self.create_node(name, kind)?;
        self.link(parent, id);
        debug!("Created {:?} '{}' under {}", kind, self.label(id), parent);
        Ok(id)
    }

    /// Appends a detached node to `parent`'s children.
    pub fn attach(&mut self, node: NodeId, parent: NodeId) -> Result<(), TreeError> {
        let attached = self.node(node)?.parent.is_some();
        ensure!(node != self.root, CannotMoveRootSnafu);
        ensure!(
            !attached,
            AlreadyAttachedSnafu {
                name: self.label(node),
            }
        );
        self.ensure_directory(parent)?;
        ensure!(
            !self.is_within(parent, node),
            WouldCreateCycleSnafu {
                name: self.label(node),
            }
        );

        self.link(parent, node);
        Ok(())
    }

    /// Removes `node` from its parent's children, keeping its subtree intact.
    /// Detaching a node that is already detached does nothing.
    pub fn detach(&mut self, node: NodeId) -> Result<(), TreeError> {
        ensure!(node != self.root, CannotMoveRootSnafu);
        let Some(parent) = self.node_mut(node)?.parent.take() else {
            return Ok(());
        };

        let siblings = &mut self.node_mut(parent)?.children;
        if let Some(position) = siblings.iter().position(|&child| child == node) {
            siblings.remove(position);
        }
        Ok(())
    }

    /// Detaches `node` and destroys it together with all of its descendants.
    pub fn delete_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        ensure!(node != self.root, CannotDeleteRootSnafu);
        self.detach(node)?;

        let mut released = 0;
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            if let Some(removed) = self.slots.get_mut(id.0).and_then(Option::take) {
                pending.extend(removed.children);
                released += 1;
            }
        }
        self.live -= released;

        debug!("Deleted {} with {} node(s) in its subtree", node, released);
        Ok(())
    }

    pub(crate) fn ensure_directory(&self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        ensure!(
            node.is_directory(),
            NotADirectorySnafu {
                name: node.name.clone(),
            }
        );
        Ok(())
    }

    /// Raw linking without validation; callers check the invariants first.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(Some(node)) = self.slots.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(Some(node)) = self.slots.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    /// Human readable name for messages, falling back to the id.
    pub(crate) fn label(&self, id: NodeId) -> String {
        self.get(id)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("Not a directory: {name}"))]
    NotADirectory { name: String },
    #[snafu(display("Cannot delete root node"))]
    CannotDeleteRoot,
    #[snafu(display("Cannot move root node"))]
    CannotMoveRoot,
    #[snafu(display("Not found: {target}"))]
    NodeNotFound { target: String },
    #[snafu(display("Path not found: {path}"))]
    PathNotFound { path: String },
    #[snafu(display("Invalid path: {path}"))]
    InvalidPath { path: String },
    #[snafu(display("Node name must not be empty"))]
    InvalidArgument,
    #[snafu(display("Merge failed: Both nodes should be directories"))]
    MergeFailed,
    #[snafu(display("Cannot place '{name}' inside its own subtree"))]
    WouldCreateCycle { name: String },
    #[snafu(display("'{name}' is already attached to a directory"))]
    AlreadyAttached { name: String },
}
