//! Lossless binary form of a tree.
//!
//! Layout: `b"TFS1"`, the little-endian MetroHash64 of the payload, then the
//! payload itself (a bincode-encoded [`Snapshot`] compressed with zstd).
//!
//! A snapshot is a flat pre-order list of entries with their depth, so
//! nesting survives without recursive data.

use std::hash::Hasher;

use bincode::{Decode, Encode};
use metrohash::MetroHash64;
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::debug;

use crate::filesystem::{ExportOrder, FileTree, NodeId, NodeKind, TreeError, TreePolicy};

const MAGIC: &[u8; 4] = b"TFS1";
const CHECKSUM_LEN: usize = 8;
const COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct SnapshotEntry {
    /// Distance from the snapshot root, which sits at 0.
    pub depth: u32,
    pub kind: NodeKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Snapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Copies `start`'s subtree out of the tree, nesting included.
    pub fn capture(tree: &FileTree, start: NodeId) -> Result<Self, TreeError> {
        tree.node(start)?;
        let entries = tree
            .pre_order(start, ExportOrder::Natural)
            .into_iter()
            .map(|(id, depth)| {
                let node = tree.node(id)?;
                Ok(SnapshotEntry {
                    depth: depth as u32,
                    kind: node.kind(),
                    name: node.name().to_string(),
                })
            })
            .collect::<Result<Vec<_>, TreeError>>()?;
        Ok(Self { entries })
    }

    pub fn root_name(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.name.as_str())
    }

    /// Builds a fresh tree whose root takes the first entry's name.
    pub fn restore(&self, policy: TreePolicy) -> Result<FileTree, SnapshotError> {
        let (first, rest) = self.entries.split_first().context(RestoreSnafu {
            reason: "snapshot has no entries",
        })?;
        ensure!(
            first.depth == 0 && first.kind.is_directory(),
            RestoreSnafu {
                reason: format!("snapshot root '{}' is not a top-level directory", first.name)
            }
        );

        let mut tree = FileTree::new(first.name.clone()).with_policy(policy);
        // ancestors[d] is the most recent node at depth d
        let mut ancestors = vec![tree.root()];
        for (index, entry) in rest.iter().enumerate() {
            let depth = entry.depth as usize;
            ensure!(
                (1..=ancestors.len()).contains(&depth),
                RestoreSnafu {
                    reason: format!("entry {} jumps to depth {}", index + 1, depth)
                }
            );
            ancestors.truncate(depth);
            let parent = ancestors[depth - 1];
            let id = match entry.kind {
                NodeKind::Directory => tree.create_directory(parent, entry.name.clone()),
                NodeKind::File => tree.create_file(parent, entry.name.clone()),
            }
            .context(InvalidTreeSnafu)?;
            ancestors.push(id);
        }
        Ok(tree)
    }
}

fn checksum(payload: &[u8]) -> u64 {
    let mut hasher = MetroHash64::default();
    hasher.write(payload);
    hasher.finish()
}

pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    let encoded = bincode::encode_to_vec(snapshot, bincode::config::standard())
        .context(EncodeSnafu)?;
    let payload = zstd::encode_all(encoded.as_slice(), COMPRESSION_LEVEL)
        .context(CompressionSnafu)?;

    let mut bytes = Vec::with_capacity(MAGIC.len() + CHECKSUM_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&checksum(&payload).to_le_bytes());
    bytes.extend_from_slice(&payload);

    debug!(
        "Encoded snapshot of '{}': {} bytes raw, {} bytes framed",
        snapshot.root_name().unwrap_or_default(),
        encoded.len(),
        bytes.len()
    );
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    let body = bytes.strip_prefix(MAGIC.as_slice()).context(BadMagicSnafu)?;
    ensure!(body.len() >= CHECKSUM_LEN, TruncatedSnafu);
    let (stored, payload) = body.split_at(CHECKSUM_LEN);

    let mut expected = [0u8; CHECKSUM_LEN];
    expected.copy_from_slice(stored);
    let expected = u64::from_le_bytes(expected);
    let found = checksum(payload);
    ensure!(expected == found, ChecksumMismatchSnafu { expected, found });

    let encoded = zstd::decode_all(payload).context(CompressionSnafu)?;
    let (snapshot, _) = bincode::decode_from_slice(&encoded, bincode::config::standard())
        .context(DecodeSnafu)?;
    Ok(snapshot)
}

#[derive(Debug, Snafu)]
pub enum SnapshotError {
    #[snafu(display("Not a snapshot: missing header"))]
    BadMagic,
    #[snafu(display("Snapshot is truncated"))]
    Truncated,
    #[snafu(display(
        "Snapshot checksum mismatch: expected {expected:#018x}, found {found:#018x}"
    ))]
    ChecksumMismatch { expected: u64, found: u64 },
    #[snafu(display("Failed to compress or decompress snapshot"))]
    CompressionError { source: std::io::Error },
    #[snafu(display("Failed to encode snapshot"))]
    EncodeError {
        source: bincode::error::EncodeError,
    },
    #[snafu(display("Failed to decode snapshot"))]
    DecodeError {
        source: bincode::error::DecodeError,
    },
    #[snafu(display("Cannot restore snapshot: {reason}"))]
    RestoreError { reason: String },
    #[snafu(display("Snapshot describes an invalid tree"))]
    InvalidTree { source: TreeError },
}
