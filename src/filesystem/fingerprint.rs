use std::hash::Hasher;

use metrohash::MetroHash64;

use super::node::NodeId;
use super::policy::ExportOrder;
use super::tree::{FileTree, TreeError};

impl FileTree {
    /// Structural hash of `node`'s subtree: names, kinds and shape, but not
    /// node ids or the subtree's position in the tree.
    pub fn fingerprint(&self, node: NodeId) -> Result<u64, TreeError> {
        self.node(node)?;

        let mut hasher = MetroHash64::default();
        for (id, depth) in self.pre_order(node, ExportOrder::Natural) {
            let current = self.node(id)?;
            hasher.write_usize(depth);
            hasher.write_u8(current.kind().marker() as u8);
            hasher.write(current.name().as_bytes());
            hasher.write_u8(0);
        }
        Ok(hasher.finish())
    }
}
