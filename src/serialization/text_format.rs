//! Line format: one node per line, `D <name>` or `F <name>`, indented by two
//! spaces per level on export. Indentation is ignored on import, so every
//! imported line becomes a direct child of the target directory.

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::filesystem::{ExportOrder, FileTree, ImportMode, NodeId, NodeKind, TreeError};

const INDENT: &str = "  ";

/// Renders `start`'s subtree as indented lines.
pub fn export_lines(
    tree: &FileTree,
    start: NodeId,
    order: ExportOrder,
) -> Result<Vec<String>, TreeError> {
    tree.node(start)?;
    tree.pre_order(start, order)
        .into_iter()
        .map(|(id, depth)| {
            let node = tree.node(id)?;
            Ok(format!(
                "{}{} {}",
                INDENT.repeat(depth),
                node.kind().marker(),
                node.name()
            ))
        })
        .collect()
}

/// Creates one child of `target` per non-blank line and returns how many
/// were created.
///
/// With [`ImportMode::Atomic`] every line is validated before the first node
/// is attached; with [`ImportMode::Prefix`] nodes are attached as lines are
/// read and the ones before a malformed line stay in the tree.
pub fn import_lines<I, S>(
    tree: &mut FileTree,
    target: NodeId,
    lines: I,
    mode: ImportMode,
) -> Result<usize, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tree.ensure_directory(target).context(TreeSnafu)?;

    let mut created = 0;
    match mode {
        ImportMode::Atomic => {
            let entries = lines
                .into_iter()
                .enumerate()
                .filter_map(|(index, line)| parse_line(index + 1, line.as_ref()).transpose())
                .collect::<Result<Vec<_>, _>>()?;
            for (kind, name) in entries {
                create(tree, target, kind, name)?;
                created += 1;
            }
        }
        ImportMode::Prefix => {
            for (index, line) in lines.into_iter().enumerate() {
                let parsed = parse_line(index + 1, line.as_ref());
                if let Err(error) = &parsed {
                    warn!("Import stopped after {} node(s): {}", created, error);
                }
                if let Some((kind, name)) = parsed? {
                    create(tree, target, kind, name)?;
                    created += 1;
                }
            }
        }
    }

    debug!("Imported {} node(s) into {}", created, target);
    Ok(created)
}

fn create(
    tree: &mut FileTree,
    target: NodeId,
    kind: NodeKind,
    name: String,
) -> Result<NodeId, FormatError> {
    match kind {
        NodeKind::Directory => tree.create_directory(target, name),
        NodeKind::File => tree.create_file(target, name),
    }
    .context(TreeSnafu)
}

/// Parses a single line; blank lines yield `None`.
fn parse_line(line_number: usize, line: &str) -> Result<Option<(NodeKind, String)>, FormatError> {
    let entry = line.trim_start().trim_end_matches(['\r', '\n']);
    let mut chars = entry.chars();
    let Some(marker) = chars.next() else {
        return Ok(None);
    };

    let kind = NodeKind::from_marker(marker);
    let name = chars.as_str().strip_prefix(' ').filter(|name| !name.is_empty());
    match (kind, name) {
        (Some(kind), Some(name)) => Ok(Some((kind, name.to_string()))),
        _ => InvalidFormatSnafu { line_number, line }.fail(),
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FormatError {
    #[snafu(display("Invalid file structure at line {line_number}: {line}"))]
    InvalidFormat { line_number: usize, line: String },
    #[snafu(display("{source}"))]
    Tree { source: TreeError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{assert_tree_invariant, docs_tree};
    use rstest::*;

    fn direct_children(tree: &FileTree, dir: NodeId) -> Vec<(NodeKind, String)> {
        tree.children(dir)
            .unwrap()
            .iter()
            .map(|&id| (tree.kind(id).unwrap(), tree.name(id).unwrap().to_string()))
            .collect()
    }

    #[test]
    fn export_of_nested_file_indents_by_depth() {
        let mut tree = FileTree::default();
        let root = tree.root();
        let docs = tree.create_directory(root, "docs").unwrap();
        tree.create_file(docs, "a.txt").unwrap();

        let lines = export_lines(&tree, docs, ExportOrder::Natural).unwrap();

        assert_eq!(lines, vec!["D docs", "  F a.txt"]);
    }

    #[rstest]
    fn natural_export_is_left_to_right(docs_tree: FileTree) {
        let lines = export_lines(&docs_tree, docs_tree.root(), ExportOrder::Natural).unwrap();
        assert_eq!(
            lines,
            vec![
                "D root",
                "  D docs",
                "    F a.txt",
                "    D drafts",
                "      F b.txt",
                "  F notes.txt",
            ]
        );
    }

    #[rstest]
    fn stack_export_reverses_siblings(docs_tree: FileTree) {
        let lines = export_lines(&docs_tree, docs_tree.root(), ExportOrder::Stack).unwrap();
        assert_eq!(
            lines,
            vec![
                "D root",
                "  F notes.txt",
                "  D docs",
                "    D drafts",
                "      F b.txt",
                "    F a.txt",
            ]
        );
    }

    #[test]
    fn nesting_is_flattened_on_reimport() {
        let mut source = FileTree::default();
        let root = source.root();
        let docs = source.create_directory(root, "docs").unwrap();
        source.create_file(docs, "a.txt").unwrap();
        let lines = export_lines(&source, docs, ExportOrder::Natural).unwrap();

        let mut target = FileTree::default();
        let target_root = target.root();
        let created = import_lines(&mut target, target_root, &lines, ImportMode::Atomic).unwrap();

        assert_eq!(created, 2);
        assert_eq!(
            direct_children(&target, target_root),
            vec![
                (NodeKind::Directory, "docs".to_string()),
                (NodeKind::File, "a.txt".to_string()),
            ]
        );
        let imported_docs = target.search_by_name(target_root, "docs").unwrap();
        assert!(target.children(imported_docs).unwrap().is_empty());
        assert_tree_invariant(&target);
    }

    #[rstest]
    #[case(ExportOrder::Natural)]
    #[case(ExportOrder::Stack)]
    fn round_trip_preserves_kind_name_multiset(docs_tree: FileTree, #[case] order: ExportOrder) {
        let root = docs_tree.root();
        let lines = export_lines(&docs_tree, root, order).unwrap();

        let mut fresh = FileTree::default();
        let fresh_root = fresh.root();
        import_lines(&mut fresh, fresh_root, &lines, ImportMode::Atomic).unwrap();

        let mut exported: Vec<(char, String)> = docs_tree
            .level_order(root)
            .into_iter()
            .map(|id| (docs_tree.kind(id).unwrap().marker(), docs_tree.label(id)))
            .collect();
        let mut imported: Vec<(char, String)> = direct_children(&fresh, fresh_root)
            .into_iter()
            .map(|(kind, name)| (kind.marker(), name))
            .collect();
        exported.sort();
        imported.sort();

        assert_eq!(imported, exported);
    }

    #[rstest]
    #[case("D docs", Some((NodeKind::Directory, "docs")))]
    #[case("    F deep.txt", Some((NodeKind::File, "deep.txt")))]
    #[case("F name with spaces", Some((NodeKind::File, "name with spaces")))]
    #[case("F crlf.txt\r", Some((NodeKind::File, "crlf.txt")))]
    #[case("", None)]
    #[case("   ", None)]
    fn parse_line_accepts(#[case] line: &str, #[case] expected: Option<(NodeKind, &str)>) {
        let parsed = parse_line(1, line).unwrap();
        assert_eq!(
            parsed,
            expected.map(|(kind, name)| (kind, name.to_string()))
        );
    }

    #[rstest]
    #[case("X docs")]
    #[case("d docs")]
    #[case("D")]
    #[case("Ddocs")]
    #[case("F ")]
    fn parse_line_rejects(#[case] line: &str) {
        let result = parse_line(7, line);
        assert!(matches!(
            result,
            Err(FormatError::InvalidFormat { line_number: 7, .. })
        ));
    }

    #[test]
    fn atomic_import_leaves_tree_untouched_on_bad_line() {
        let mut tree = FileTree::default();
        let root = tree.root();
        let lines = ["D first", "F second", "? broken", "F never"];

        let result = import_lines(&mut tree, root, lines, ImportMode::Atomic);

        assert!(matches!(
            result,
            Err(FormatError::InvalidFormat { line_number: 3, .. })
        ));
        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn prefix_import_keeps_lines_before_the_bad_one() {
        let mut tree = FileTree::default();
        let root = tree.root();
        let lines = ["D first", "F second", "? broken", "F never"];

        let result = import_lines(&mut tree, root, lines, ImportMode::Prefix);

        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid file structure at line 3: ? broken"
        );
        assert_eq!(
            direct_children(&tree, root),
            vec![
                (NodeKind::Directory, "first".to_string()),
                (NodeKind::File, "second".to_string()),
            ]
        );
    }

    #[rstest]
    fn import_into_a_file_is_rejected(mut docs_tree: FileTree) {
        let notes = docs_tree.search_by_name(docs_tree.root(), "notes.txt").unwrap();
        let result = import_lines(&mut docs_tree, notes, ["F x"], ImportMode::Atomic);
        assert!(matches!(
            result,
            Err(FormatError::Tree {
                source: TreeError::NotADirectory { .. }
            })
        ));
    }

    #[test]
    fn import_appends_after_existing_children() {
        let mut tree = FileTree::default();
        let root = tree.root();
        tree.create_file(root, "existing").unwrap();

        import_lines(&mut tree, root, ["", "D added", ""], ImportMode::Atomic).unwrap();

        assert_eq!(
            direct_children(&tree, root),
            vec![
                (NodeKind::File, "existing".to_string()),
                (NodeKind::Directory, "added".to_string()),
            ]
        );
    }
}
