use std::collections::VecDeque;

use snafu::ensure;
use tracing::debug;

use super::node::NodeId;
use super::policy::{ExportOrder, PathResolution};
use super::tree::{FileTree, InvalidPathSnafu, PathNotFoundSnafu, TreeError};

impl FileTree {
    /// Pre-order depth-first search starting with `start` itself.
    ///
    /// Only directories are descended into; the first node named `name` wins.
    pub fn search_by_name(&self, start: NodeId, name: &str) -> Option<NodeId> {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let node = self.get(id)?;
            if node.name() == name {
                return Some(id);
            }
            if node.is_directory() {
                pending.extend(node.children().iter().rev());
            }
        }
        None
    }

    /// Resolves a `/`-separated path one segment at a time.
    ///
    /// Empty segments are skipped. Each segment is searched for with
    /// [`search_by_name`](Self::search_by_name) in the subtree of the node
    /// reached so far, so a segment may match that node itself. The segment
    /// order follows the tree's [`PathResolution`] policy.
    pub fn search_by_path(&self, start: NodeId, path: &str) -> Result<NodeId, TreeError> {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if self.policy().path_resolution == PathResolution::Reversed {
            segments.reverse();
        }

        let mut current = self.node(start).map(|_| start)?;
        for segment in segments {
            ensure!(self.kind(current)?.is_directory(), InvalidPathSnafu { path });
            current = match self.search_by_name(current, segment) {
                Some(found) => found,
                None => return PathNotFoundSnafu { path }.fail(),
            };
        }

        debug!("Resolved path '{}' to {}", path, current);
        Ok(current)
    }

    /// Breadth-first listing of `start`'s subtree, `start` included.
    pub fn level_order(&self, start: NodeId) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.get(id) else { continue };
            visited.push(id);
            queue.extend(node.children());
        }
        visited
    }

    /// Depth-first listing of `start`'s subtree paired with each node's depth
    /// relative to `start`.
    ///
    /// [`ExportOrder::Stack`] visits the last child of every directory first.
    pub fn pre_order(&self, start: NodeId, order: ExportOrder) -> Vec<(NodeId, usize)> {
        let mut visited = Vec::new();
        let mut pending = vec![(start, 0)];
        while let Some((id, depth)) = pending.pop() {
            let Some(node) = self.get(id) else { continue };
            visited.push((id, depth));

            let children = node.children().iter().map(|&child| (child, depth + 1));
            match order {
                ExportOrder::Natural => pending.extend(children.rev()),
                ExportOrder::Stack => pending.extend(children),
            }
        }
        visited
    }
}
