use bincode::{Decode, Encode};
use derive_more::Display;

/// Stable handle of a node inside a [`FileTree`](super::FileTree).
///
/// Identifiers are never reused after a node is destroyed, so a stale id
/// resolves to nothing rather than to some unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(pub(crate) usize);

/// Represents the type of a filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Encode, Decode)]
pub enum NodeKind {
    #[display("F")]
    File,
    #[display("D")]
    Directory,
}

impl NodeKind {
    pub fn is_directory(self) -> bool {
        self == NodeKind::Directory
    }

    /// Single-character marker used by the line format.
    pub fn marker(self) -> char {
        match self {
            NodeKind::File => 'F',
            NodeKind::Directory => 'D',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'F' => Some(NodeKind::File),
            'D' => Some(NodeKind::Directory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
