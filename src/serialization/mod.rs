//! Conversions between a [`FileTree`](crate::filesystem::FileTree) and its
//! persisted forms: the indented line format and binary snapshots.

mod snapshot;
mod text_format;

pub use snapshot::{
    Snapshot, SnapshotError, decode as decode_snapshot, encode as encode_snapshot,
};
pub use text_format::{FormatError, export_lines, import_lines};
