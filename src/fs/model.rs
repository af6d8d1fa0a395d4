//! Lazily loaded filesystem tree.
//!
//! Directories start `Unloaded`; expanding one hands its path back to the
//! caller to list in the background, and the listing arrives later through
//! [`FsTree::apply_listing`]. Nodes are addressed by path: every child path
//! is its parent's path joined with the child name, so a lookup walks down
//! from the root whose path prefixes the target.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::fs::format::type_name;

// ── Entries ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// One row of the tree: a file or directory and the metadata shown in the
/// Size / Type / Date Modified columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    /// Zero for directories.
    pub size: u64,
    pub modified: Option<DateTime<Local>>,
}

impl FsEntry {
    pub fn from_metadata(path: PathBuf, name: String, meta: &std::fs::Metadata) -> Self {
        let kind = if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Self {
            path,
            name,
            kind,
            size: if kind == EntryKind::Dir { 0 } else { meta.len() },
            modified: meta.modified().ok().map(DateTime::<Local>::from),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// File extension, `None` for directories and extension-less files.
    pub fn extension(&self) -> Option<&str> {
        if self.is_dir() {
            return None;
        }
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }
}

/// Build the entry for a user-supplied root directory.
pub fn root_entry(path: &Path) -> std::io::Result<FsEntry> {
    let path = path.canonicalize()?;
    let meta = std::fs::metadata(&path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FsEntry::from_metadata(path, name, &meta))
}

/// Top-level entries shown when no root directory is given: the filesystem
/// root on Unix, every mounted drive letter on Windows.
pub fn filesystem_roots() -> Vec<FsEntry> {
    #[cfg(windows)]
    let candidates: Vec<PathBuf> = (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .collect();
    #[cfg(not(windows))]
    let candidates = vec![PathBuf::from("/")];

    candidates
        .into_iter()
        .filter_map(|path| {
            let meta = std::fs::metadata(&path).ok()?;
            let name = path.display().to_string();
            Some(FsEntry::from_metadata(path, name, &meta))
        })
        .collect()
}

// ── Sorting ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Name,
    Size,
    Type,
    Modified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Directories always come first; `order` only reverses the column part.
fn compare_entries(a: &FsEntry, b: &FsEntry, column: SortColumn, order: SortOrder) -> Ordering {
    let dirs_first = b.is_dir().cmp(&a.is_dir());
    if dirs_first != Ordering::Equal {
        return dirs_first;
    }
    let by_name = || {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    };
    let ord = match column {
        SortColumn::Name => by_name(),
        SortColumn::Size => a.size.cmp(&b.size).then_with(by_name),
        SortColumn::Type => type_name(a).cmp(&type_name(b)).then_with(by_name),
        SortColumn::Modified => a.modified.cmp(&b.modified).then_with(by_name),
    };
    match order {
        SortOrder::Ascending => ord,
        SortOrder::Descending => ord.reverse(),
    }
}

// ── Nodes ──────────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum Children {
    Unloaded,
    Loading,
    Loaded(Vec<Node>),
    Failed(String),
}

#[derive(Debug)]
pub struct Node {
    entry: FsEntry,
    children: Children,
    expanded: bool,
}

impl Node {
    fn new(entry: FsEntry) -> Self {
        Self {
            entry,
            children: Children::Unloaded,
            expanded: false,
        }
    }

    pub fn entry(&self) -> &FsEntry {
        &self.entry
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.children, Children::Loading)
    }

    /// Why the directory could not be listed, if it could not.
    pub fn failure(&self) -> Option<&str> {
        match &self.children {
            Children::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    fn sort_recursive(&mut self, column: SortColumn, order: SortOrder) {
        if let Children::Loaded(children) = &mut self.children {
            children.sort_by(|a, b| compare_entries(&a.entry, &b.entry, column, order));
            for child in children {
                child.sort_recursive(column, order);
            }
        }
    }
}

/// A visible row: the node and how deep it is nested.
pub struct Row<'a> {
    pub depth: usize,
    pub node: &'a Node,
}

fn find<'a>(nodes: &'a [Node], path: &Path) -> Option<&'a Node> {
    for node in nodes {
        if node.entry.path == path {
            return Some(node);
        }
        if path.starts_with(&node.entry.path) {
            return match &node.children {
                Children::Loaded(children) => find(children, path),
                _ => None,
            };
        }
    }
    None
}

fn find_in<'a>(nodes: &'a mut [Node], path: &Path) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.entry.path == path {
            return Some(node);
        }
        if path.starts_with(&node.entry.path) {
            return match &mut node.children {
                Children::Loaded(children) => find_in(children, path),
                _ => None,
            };
        }
    }
    None
}

// ── Tree ───────────────────────────────────────────────────────────────────────

pub struct FsTree {
    roots: Vec<Node>,
    selected: Option<PathBuf>,
    sort_column: SortColumn,
    sort_order: SortOrder,
}

impl FsTree {
    pub fn new(roots: Vec<FsEntry>, sort_column: SortColumn, sort_order: SortOrder) -> Self {
        let mut roots: Vec<Node> = roots.into_iter().map(Node::new).collect();
        roots.sort_by(|a, b| compare_entries(&a.entry, &b.entry, SortColumn::Name, SortOrder::Ascending));
        Self {
            roots,
            selected: None,
            sort_column,
            sort_order,
        }
    }

    pub fn sort_column(&self) -> SortColumn {
        self.sort_column
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    fn find_mut(&mut self, path: &Path) -> Option<&mut Node> {
        find_in(&mut self.roots, path)
    }

    /// Expand or collapse a directory. Returns the path to list when an
    /// unloaded directory is expanded.
    pub fn toggle(&mut self, path: &Path) -> Option<PathBuf> {
        let node = self.find_mut(path)?;
        if !node.entry.is_dir() {
            return None;
        }
        node.expanded = !node.expanded;
        Self::request_if_unloaded(node)
    }

    /// Expand a directory without collapsing it if already open.
    pub fn expand(&mut self, path: &Path) -> Option<PathBuf> {
        let node = self.find_mut(path)?;
        if !node.entry.is_dir() {
            return None;
        }
        node.expanded = true;
        Self::request_if_unloaded(node)
    }

    fn request_if_unloaded(node: &mut Node) -> Option<PathBuf> {
        if node.expanded && matches!(node.children, Children::Unloaded) {
            node.children = Children::Loading;
            return Some(node.entry.path.clone());
        }
        None
    }

    /// Install a directory listing. Children that were already loaded keep
    /// their own subtree and expansion state. Unknown paths are ignored.
    pub fn apply_listing(&mut self, path: &Path, entries: Vec<FsEntry>) {
        let (column, order) = (self.sort_column, self.sort_order);
        let Some(node) = self.find_mut(path) else {
            log::debug!("listing for {} no longer in tree", path.display());
            return;
        };

        let mut previous: HashMap<PathBuf, Node> =
            match std::mem::replace(&mut node.children, Children::Unloaded) {
                Children::Loaded(old) => old.into_iter().map(|n| (n.entry.path.clone(), n)).collect(),
                _ => HashMap::new(),
            };

        let mut children: Vec<Node> = entries
            .into_iter()
            .map(|entry| match previous.remove(&entry.path) {
                Some(mut old) if old.entry.kind == entry.kind => {
                    old.entry = entry;
                    old
                }
                _ => Node::new(entry),
            })
            .collect();
        children.sort_by(|a, b| compare_entries(&a.entry, &b.entry, column, order));
        node.children = Children::Loaded(children);

        let stale = self
            .selected
            .as_deref()
            .is_some_and(|sel| sel != path && sel.starts_with(path) && find(&self.roots, sel).is_none());
        if stale {
            self.selected = None;
        }
    }

    pub fn apply_failure(&mut self, path: &Path, reason: String) {
        if let Some(node) = self.find_mut(path) {
            node.children = Children::Failed(reason);
        }
    }

    /// Re-list a directory. An expanded directory keeps showing its current
    /// children until the new listing arrives; a collapsed one is simply
    /// forgotten and reloads the next time it is opened.
    pub fn refresh(&mut self, path: &Path) -> Option<PathBuf> {
        let node = self.find_mut(path)?;
        if !node.entry.is_dir() || node.is_loading() {
            return None;
        }
        if node.expanded {
            if !matches!(node.children, Children::Loaded(_)) {
                node.children = Children::Loading;
            }
            Some(node.entry.path.clone())
        } else {
            node.children = Children::Unloaded;
            None
        }
    }

    /// Forget every collapsed listing and return the expanded directories,
    /// including those still loading, that must be re-listed, outermost first.
    pub fn invalidate(&mut self) -> Vec<PathBuf> {
        fn walk(nodes: &mut [Node], out: &mut Vec<PathBuf>) {
            for node in nodes {
                let expanded = node.expanded;
                let reset = match &mut node.children {
                    Children::Unloaded => None,
                    Children::Loading if expanded => {
                        out.push(node.entry.path.clone());
                        None
                    }
                    Children::Loaded(children) if expanded => {
                        out.push(node.entry.path.clone());
                        walk(children, out);
                        None
                    }
                    Children::Failed(_) if expanded => {
                        out.push(node.entry.path.clone());
                        Some(Children::Loading)
                    }
                    _ => Some(Children::Unloaded),
                };
                if let Some(children) = reset {
                    node.children = children;
                }
            }
        }
        let mut out = Vec::new();
        walk(&mut self.roots, &mut out);
        out
    }

    pub fn select(&mut self, path: &Path) {
        self.selected = Some(path.to_path_buf());
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Clicking the active column flips the order; a new column starts
    /// ascending.
    pub fn sort_by(&mut self, column: SortColumn) {
        if column == self.sort_column {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_column = column;
            self.sort_order = SortOrder::Ascending;
        }
        for root in &mut self.roots {
            root.sort_recursive(self.sort_column, self.sort_order);
        }
    }

    /// Depth-first list of every row whose ancestors are all expanded.
    pub fn visible_rows(&self) -> Vec<Row<'_>> {
        fn walk<'a>(nodes: &'a [Node], depth: usize, out: &mut Vec<Row<'a>>) {
            for node in nodes {
                out.push(Row { depth, node });
                if node.expanded {
                    if let Children::Loaded(children) = &node.children {
                        walk(children, depth + 1, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, 0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(path: &str) -> FsEntry {
        entry(path, EntryKind::Dir, 0)
    }

    fn file(path: &str, size: u64) -> FsEntry {
        entry(path, EntryKind::File, size)
    }

    fn entry(path: &str, kind: EntryKind, size: u64) -> FsEntry {
        let path = PathBuf::from(path);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        FsEntry {
            path,
            name,
            kind,
            size,
            modified: None,
        }
    }

    fn names(tree: &FsTree) -> Vec<(usize, String)> {
        tree.visible_rows()
            .iter()
            .map(|row| (row.depth, row.node.entry().name.clone()))
            .collect()
    }

    fn tree_with_root() -> FsTree {
        FsTree::new(vec![dir("/r")], SortColumn::Name, SortOrder::Ascending)
    }

    #[test]
    fn expanding_unloaded_dir_requests_listing_once() {
        let mut tree = tree_with_root();
        assert_eq!(tree.toggle(Path::new("/r")), Some(PathBuf::from("/r")));
        assert!(tree.visible_rows()[0].node.is_loading());

        // Collapse and re-expand while the listing is in flight.
        assert_eq!(tree.toggle(Path::new("/r")), None);
        assert_eq!(tree.toggle(Path::new("/r")), None);
    }

    #[test]
    fn listing_is_sorted_dirs_first_case_insensitive() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(
            Path::new("/r"),
            vec![file("/r/b.txt", 1), dir("/r/Zeta"), file("/r/A.md", 2), dir("/r/alpha")],
        );
        assert_eq!(
            names(&tree),
            vec![
                (0, "r".to_string()),
                (1, "alpha".to_string()),
                (1, "Zeta".to_string()),
                (1, "A.md".to_string()),
                (1, "b.txt".to_string()),
            ]
        );
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![dir("/r/sub")]);
        tree.toggle(Path::new("/r/sub"));
        tree.apply_listing(Path::new("/r/sub"), vec![file("/r/sub/x", 3)]);
        assert_eq!(names(&tree).len(), 3);

        tree.toggle(Path::new("/r"));
        assert_eq!(names(&tree), vec![(0, "r".to_string())]);
    }

    #[test]
    fn toggling_a_file_does_nothing() {
        let mut tree = tree_with_root();
        tree.expand(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![file("/r/f", 1)]);
        assert_eq!(tree.toggle(Path::new("/r/f")), None);
        assert!(!tree.visible_rows()[1].node.is_expanded());
    }

    #[test]
    fn failure_marks_node_and_shows_no_children() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_failure(Path::new("/r"), "permission denied".into());
        let rows = tree.visible_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node.failure(), Some("permission denied"));
    }

    #[test]
    fn listing_for_unknown_path_is_ignored() {
        let mut tree = tree_with_root();
        tree.apply_listing(Path::new("/elsewhere"), vec![file("/elsewhere/a", 1)]);
        assert_eq!(names(&tree).len(), 1);
    }

    #[test]
    fn sort_by_same_column_flips_and_keeps_dirs_first() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(
            Path::new("/r"),
            vec![file("/r/small", 10), file("/r/big", 1000), dir("/r/d")],
        );

        tree.sort_by(SortColumn::Size);
        assert_eq!(tree.sort_order(), SortOrder::Ascending);
        let order: Vec<_> = names(&tree).into_iter().skip(1).map(|(_, n)| n).collect();
        assert_eq!(order, ["d", "small", "big"]);

        tree.sort_by(SortColumn::Size);
        assert_eq!(tree.sort_order(), SortOrder::Descending);
        let order: Vec<_> = names(&tree).into_iter().skip(1).map(|(_, n)| n).collect();
        assert_eq!(order, ["d", "big", "small"]);

        tree.sort_by(SortColumn::Name);
        assert_eq!(tree.sort_column(), SortColumn::Name);
        assert_eq!(tree.sort_order(), SortOrder::Ascending);
    }

    #[test]
    fn relisting_preserves_expanded_subtrees() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![dir("/r/keep"), file("/r/gone", 1)]);
        tree.toggle(Path::new("/r/keep"));
        tree.apply_listing(Path::new("/r/keep"), vec![file("/r/keep/inner", 1)]);

        assert_eq!(tree.refresh(Path::new("/r")), Some(PathBuf::from("/r")));
        tree.apply_listing(Path::new("/r"), vec![dir("/r/keep"), file("/r/new", 1)]);
        assert_eq!(
            names(&tree),
            vec![
                (0, "r".to_string()),
                (1, "keep".to_string()),
                (2, "inner".to_string()),
                (1, "new".to_string()),
            ]
        );
    }

    #[test]
    fn refresh_of_collapsed_dir_reloads_lazily() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![dir("/r/a")]);
        tree.toggle(Path::new("/r"));
        assert_eq!(tree.refresh(Path::new("/r")), None);
        assert_eq!(tree.toggle(Path::new("/r")), Some(PathBuf::from("/r")));
    }

    #[test]
    fn invalidate_returns_expanded_dirs_outermost_first() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![dir("/r/open"), dir("/r/shut")]);
        tree.toggle(Path::new("/r/open"));
        tree.apply_listing(Path::new("/r/open"), vec![]);
        tree.toggle(Path::new("/r/shut"));
        tree.apply_listing(Path::new("/r/shut"), vec![]);
        tree.toggle(Path::new("/r/shut"));

        assert_eq!(
            tree.invalidate(),
            vec![PathBuf::from("/r"), PathBuf::from("/r/open")]
        );
        assert_eq!(tree.toggle(Path::new("/r/shut")), Some(PathBuf::from("/r/shut")));
    }

    #[test]
    fn invalidate_relists_directories_still_loading() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        assert!(tree.visible_rows()[0].node.is_loading());
        assert_eq!(tree.invalidate(), vec![PathBuf::from("/r")]);

        // A collapsed directory whose listing is in flight reloads when reopened.
        tree.toggle(Path::new("/r"));
        assert!(tree.invalidate().is_empty());
        assert_eq!(tree.toggle(Path::new("/r")), Some(PathBuf::from("/r")));
    }

    #[test]
    fn selection_is_dropped_when_entry_disappears() {
        let mut tree = tree_with_root();
        tree.toggle(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![file("/r/a", 1), file("/r/b", 1)]);
        tree.select(Path::new("/r/a"));
        tree.refresh(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![file("/r/b", 1)]);
        assert_eq!(tree.selected(), None);

        tree.select(Path::new("/r/b"));
        tree.apply_listing(Path::new("/r"), vec![file("/r/b", 2)]);
        assert_eq!(tree.selected(), Some(Path::new("/r/b")));
    }

    #[test]
    fn extension_only_for_files() {
        assert_eq!(file("/r/a.tar.gz", 1).extension(), Some("gz"));
        assert_eq!(file("/r/.bashrc", 1).extension(), None);
        assert_eq!(dir("/r/x.d").extension(), None);
    }
}
