use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::config::Settings;
use crate::filesystem::{FileTree, NodeId, TreeError};
use crate::serialization::{
    FormatError, Snapshot, SnapshotError, decode_snapshot, encode_snapshot, export_lines,
    import_lines,
};
use crate::shell::{Command, Report, level_order_listing};
use crate::storage::{self, StorageError};

/// A tree plus everything needed to run shell commands against it.
pub struct Session {
    tree: FileTree,
    settings: Settings,
    workdir: PathBuf,
    color: bool,
}

impl Session {
    pub fn new(settings: Settings, workdir: PathBuf) -> Self {
        let tree = FileTree::new(settings.root_name.clone()).with_policy(settings.policy);
        Self {
            tree,
            settings,
            workdir,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[cfg(test)]
    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub async fn execute(&mut self, command: Command) -> Result<Report, SessionError> {
        debug!("Executing {:?}", command);
        let root = self.tree.root();

        let report = match command {
            Command::Mkdir { name, parent } => {
                let parent = self.resolve_parent(parent.as_deref())?;
                self.tree
                    .create_directory(parent, name.clone())
                    .context(TreeSnafu)?;
                Report::DirectoryCreated(name)
            }
            Command::Touch { name, parent } => {
                let parent = self.resolve_parent(parent.as_deref())?;
                self.tree
                    .create_file(parent, name.clone())
                    .context(TreeSnafu)?;
                Report::FileCreated(name)
            }
            Command::Copy {
                source,
                destination,
            } => {
                let (node, target) = self.resolve_pair(&source, &destination)?;
                self.tree.copy(node, target).context(TreeSnafu)?;
                Report::Copied(source)
            }
            Command::Cut {
                source,
                destination,
            } => {
                let (node, target) = self.resolve_pair(&source, &destination)?;
                self.tree.cut(node, target).context(TreeSnafu)?;
                Report::Cut(source)
            }
            Command::Paste {
                source,
                destination,
            } => {
                let (node, target) = self.resolve_pair(&source, &destination)?;
                self.relink(node, target).context(TreeSnafu)?;
                Report::Pasted(source)
            }
            Command::Merge { into, from } => {
                let (target, source) = self.resolve_pair(&into, &from)?;
                self.tree.merge(target, source).context(TreeSnafu)?;
                Report::Merged { from, into }
            }
            Command::Delete { name } => {
                let node = self.resolve_name(&name)?;
                self.tree.delete_node(node).context(TreeSnafu)?;
                Report::Deleted
            }
            Command::Find { name } => {
                let node = self.resolve_name(&name)?;
                Report::Found(self.tree.name(node).context(TreeSnafu)?.to_string())
            }
            Command::Resolve { path } => {
                let node = self.tree.search_by_path(root, &path).context(TreeSnafu)?;
                Report::Found(self.tree.name(node).context(TreeSnafu)?.to_string())
            }
            Command::Export { file } => {
                let path = self.file_path(&file);
                let lines = export_lines(&self.tree, root, self.settings.policy.export_order)
                    .context(TreeSnafu)?;
                storage::write_lines(&path, &lines)
                    .await
                    .context(StorageSnafu)?;
                Report::Exported(lines.len())
            }
            Command::Import { file } => {
                let path = self.file_path(&file);
                let lines = storage::read_lines(&path).await.context(StorageSnafu)?;
                let created = import_lines(&mut self.tree, root, &lines, self.settings.policy.import)
                    .context(FormatSnafu)?;
                Report::Imported(created)
            }
            Command::Display => {
                Report::Listing(level_order_listing(&self.tree, root, self.color))
            }
            Command::Open { path } => {
                let name = self
                    .tree
                    .search_by_path(root, &path)
                    .ok()
                    .and_then(|node| self.tree.get(node))
                    .filter(|node| node.is_directory())
                    .map(|node| node.name().to_string());
                match name {
                    Some(name) => Report::Opened { name, path },
                    None => return DirectoryNotFoundSnafu { path }.fail(),
                }
            }
            Command::Save { file } => {
                let path = self.file_path(&file);
                let snapshot = Snapshot::capture(&self.tree, root).context(TreeSnafu)?;
                debug!(
                    "Saving {} node(s) with fingerprint {:016x}",
                    self.tree.node_count(),
                    self.tree.fingerprint(root).context(TreeSnafu)?
                );
                let bytes = encode_snapshot(&snapshot).context(SnapshotSnafu { path: &path })?;
                storage::write_bytes(&path, bytes)
                    .await
                    .context(StorageSnafu)?;
                Report::Saved(path.display().to_string())
            }
            Command::Load { file } => {
                let path = self.file_path(&file);
                let bytes = storage::read_bytes(&path).await.context(StorageSnafu)?;
                self.tree = decode_snapshot(&bytes)
                    .and_then(|snapshot| snapshot.restore(self.settings.policy))
                    .context(SnapshotSnafu { path: &path })?;
                let root = self.tree.root();
                debug!(
                    "Loaded {} node(s) with fingerprint {:016x}",
                    self.tree.node_count(),
                    self.tree.fingerprint(root).context(TreeSnafu)?
                );
                Report::Loaded(path.display().to_string())
            }
            Command::Exit => Report::Exit,
        };

        Ok(report)
    }

    fn resolve_name(&self, name: &str) -> Result<NodeId, SessionError> {
        self.tree
            .search_by_name(self.tree.root(), name)
            .ok_or_else(|| TreeError::NodeNotFound {
                target: name.to_string(),
            })
            .context(TreeSnafu)
    }

    fn resolve_pair(&self, first: &str, second: &str) -> Result<(NodeId, NodeId), SessionError> {
        Ok((self.resolve_name(first)?, self.resolve_name(second)?))
    }

    fn resolve_parent(&self, parent: Option<&str>) -> Result<NodeId, SessionError> {
        let root = self.tree.root();
        match parent {
            Some(path) => self.tree.search_by_path(root, path).context(TreeSnafu),
            None => Ok(root),
        }
    }

    /// Detaches `node` and pastes it under `target`, validating first so a
    /// failure leaves `node` where it was.
    fn relink(&mut self, node: NodeId, target: NodeId) -> Result<(), TreeError> {
        if !self.tree.kind(target)?.is_directory() {
            return Err(TreeError::NotADirectory {
                name: self.tree.name(target)?.to_string(),
            });
        }
        if node != self.tree.root() && self.tree.is_within(target, node) {
            return Err(TreeError::WouldCreateCycle {
                name: self.tree.name(node)?.to_string(),
            });
        }
        self.tree.detach(node)?;
        self.tree.paste(node, target)
    }

    fn file_path(&self, file: &Path) -> PathBuf {
        self.workdir.join(file)
    }
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(display("{source}"))]
    Tree { source: TreeError },
    #[snafu(display("{source}"))]
    Format { source: FormatError },
    #[snafu(display("{source}"))]
    Storage { source: StorageError },
    #[snafu(display("Snapshot {}: {source}", path.display()))]
    Snapshot {
        path: PathBuf,
        source: SnapshotError,
    },
    #[snafu(display("Directory not found: {path}"))]
    DirectoryNotFound { path: String },
}
