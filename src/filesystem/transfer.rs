use std::collections::VecDeque;

use snafu::{OptionExt, ensure};
use tracing::{debug, info};

use super::node::{NodeId, NodeKind};
use super::policy::CutPolicy;
use super::tree::{
    CannotMoveRootSnafu, FileTree, MergeFailedSnafu, NodeNotFoundSnafu, TreeError,
    WouldCreateCycleSnafu,
};

impl FileTree {
    /// Deep-clones `node` and appends the clone to `new_parent`.
    ///
    /// The clone is assembled detached and attached last, so copying a
    /// directory into its own subtree terminates.
    pub fn copy(&mut self, node: NodeId, new_parent: NodeId) -> Result<NodeId, TreeError> {
        self.node(node)?;
        self.ensure_directory(new_parent)?;

        let clone = self.clone_detached(node)?;
        self.link(new_parent, clone);
        debug!("Copied {} into {} as {}", node, new_parent, clone);
        Ok(clone)
    }

    /// Moves `node` under `new_parent`, or duplicates it when the tree's
    /// [`CutPolicy`] is `Duplicate`.
    ///
    /// Returns the node that now sits under `new_parent`.
    pub fn cut(&mut self, node: NodeId, new_parent: NodeId) -> Result<NodeId, TreeError> {
        match self.policy().cut {
            CutPolicy::Duplicate => self.copy(node, new_parent),
            CutPolicy::Move => {
                self.node(node)?;
                ensure!(node != self.root(), CannotMoveRootSnafu);
                self.ensure_directory(new_parent)?;
                ensure!(
                    !self.is_within(new_parent, node),
                    WouldCreateCycleSnafu {
                        name: self.label(node),
                    }
                );

                let previous = self.parent(node)?;
                self.detach(node)?;
                self.attach(node, new_parent)?;
                debug!("Moved {} from {:?} into {}", node, previous, new_parent);
                Ok(node)
            }
        }
    }

    /// Appends an already detached node to `new_parent` without cloning.
    pub fn paste(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        self.attach(node, new_parent)
    }

    /// Moves every child of `source` to the end of `target`, in order.
    ///
    /// `source` stays in the tree, empty. Returns the number of moved nodes.
    pub fn merge(&mut self, target: NodeId, source: NodeId) -> Result<usize, TreeError> {
        let target_is_dir = self.kind(target)?.is_directory();
        let source_is_dir = self.kind(source)?.is_directory();
        ensure!(target_is_dir && source_is_dir, MergeFailedSnafu);
        if target == source {
            return Ok(0);
        }
        ensure!(
            !self.is_within(target, source),
            WouldCreateCycleSnafu {
                name: self.label(source),
            }
        );

        let moved = self.children(source)?.to_vec();
        for &child in &moved {
            self.detach(child)?;
            self.paste(child, target)?;
        }

        info!(
            "Merged {} node(s) from '{}' into '{}'",
            moved.len(),
            self.label(source),
            self.label(target)
        );
        Ok(moved.len())
    }

    /// Clones `source`'s subtree without linking the clone anywhere.
    ///
    /// The whole subtree is read into a plan before the first node is
    /// allocated, and the plan is built breadth-first so siblings keep their
    /// order and depth does not grow the call stack.
    fn clone_detached(&mut self, source: NodeId) -> Result<NodeId, TreeError> {
        let mut plan: Vec<(String, NodeKind, Option<usize>)> = Vec::new();
        let mut pending: VecDeque<(NodeId, Option<usize>)> = VecDeque::from([(source, None)]);
        while let Some((id, parent_slot)) = pending.pop_front() {
            let node = self.node(id)?;
            let slot = plan.len();
            plan.push((node.name().to_string(), node.kind(), parent_slot));
            pending.extend(node.children().iter().map(|&child| (child, Some(slot))));
        }

        let mut clones: Vec<NodeId> = Vec::with_capacity(plan.len());
        for (name, kind, parent_slot) in plan {
            let clone = self.create_node(name, kind)?;
            if let Some(parent) = parent_slot.and_then(|slot| clones.get(slot).copied()) {
                self.link(parent, clone);
            }
            clones.push(clone);
        }
        clones.first().copied().context(NodeNotFoundSnafu {
            target: source.to_string(),
        })
    }
}
