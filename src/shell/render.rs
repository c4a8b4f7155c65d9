use colored::Colorize;
use supports_color::Stream;

use crate::filesystem::{FileTree, NodeId};

/// Whether stdout can show colors.
pub fn stdout_supports_color() -> bool {
    supports_color::on(Stream::Stdout).is_some()
}

/// One name per line in level order; directories are highlighted when
/// `color` is set.
pub fn level_order_listing(tree: &FileTree, start: NodeId, color: bool) -> String {
    tree.level_order(start)
        .into_iter()
        .filter_map(|id| tree.get(id))
        .map(|node| {
            if color && node.is_directory() {
                node.name().blue().bold().to_string()
            } else {
                node.name().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
