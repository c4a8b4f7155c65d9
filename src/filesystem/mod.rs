//! In-memory filesystem tree.
//!
//! This module provides an arena-backed tree of directories and files with
//! creation, deletion, search, traversal and transfer (copy, cut, paste,
//! merge) operations that keep the parent/child links consistent.

mod fingerprint;
mod node;
mod policy;
mod search;
mod transfer;
mod tree;

pub use node::{Node, NodeId, NodeKind};
pub use policy::{CutPolicy, ExportOrder, ImportMode, PathResolution, TreePolicy};
pub use tree::{DEFAULT_ROOT_NAME, FileTree, TreeError};

#[cfg(test)]
pub(crate) use tree::tests::{assert_tree_invariant, deep_chain, docs_tree};
