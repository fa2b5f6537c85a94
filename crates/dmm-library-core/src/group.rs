//! Directory grouping for the catalog view.
//!
//! Each entry is bucketed by its parent directory expressed relative to the
//! contents root. Two sentinel labels cover the remaining cases:
//!
//! - [`ROOT_GROUP`]: files directly inside the root.
//! - [`OTHER_GROUP`]: files whose directory cannot be expressed relative to
//!   the root (another volume, a relative stored path) or whose stored path
//!   has no parent.
//!
//! Directories beside the root get a `..` label, e.g. `../archive`.
//!
//! Every entry lands in exactly one group, and groups come back sorted by
//! label so the view is stable between runs.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::models::CatalogEntry;

pub const ROOT_GROUP: &str = "Root";
pub const OTHER_GROUP: &str = "Other";

/// A directory label and the entries filed under it, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup<'a> {
    pub label: String,
    pub entries: Vec<&'a CatalogEntry>,
}

impl DirectoryGroup<'_> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group label for a stored absolute path relative to `root`.
///
/// `root` should already be absolute; comparison is by path components, so
/// interior `.` segments and trailing separators do not matter.
pub fn group_label(absolute_path: &str, root: &Path) -> String {
    if absolute_path.is_empty() {
        return OTHER_GROUP.to_string();
    }
    let Some(dir) = Path::new(absolute_path).parent() else {
        return OTHER_GROUP.to_string();
    };
    let Some(parts) = relative_parts(dir, root) else {
        return OTHER_GROUP.to_string();
    };

    if parts.is_empty() {
        ROOT_GROUP.to_string()
    } else {
        parts.join("/")
    }
}

/// Components leading from `root` to `dir`, with `..` for each level climbed.
///
/// `None` when the two paths share no anchor (different prefix or volume, or
/// one relative and one absolute).
fn relative_parts(dir: &Path, root: &Path) -> Option<Vec<String>> {
    let dir: Vec<Component<'_>> = dir.components().collect();
    let root: Vec<Component<'_>> = root.components().collect();

    let common = dir
        .iter()
        .zip(root.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let anchored = |c: &Component<'_>| matches!(c, Component::Prefix(_) | Component::RootDir);
    if common == 0 || !anchored(&dir[0]) {
        return None;
    }

    let mut parts: Vec<String> = root[common..]
        .iter()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|_| "..".to_string())
        .collect();
    parts.extend(dir[common..].iter().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        _ => None,
    }));
    Some(parts)
}

/// Bucket `entries` by directory label in a single pass.
pub fn group_by_directory<'a>(entries: &'a [CatalogEntry], root: &Path) -> Vec<DirectoryGroup<'a>> {
    let mut buckets: BTreeMap<String, Vec<&'a CatalogEntry>> = BTreeMap::new();
    for entry in entries {
        buckets
            .entry(group_label(&entry.absolute_path, root))
            .or_default()
            .push(entry);
    }

    buckets
        .into_iter()
        .map(|(label, entries)| DirectoryGroup { label, entries })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionMethod;

    fn entry(path: &str) -> CatalogEntry {
        let filename = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        CatalogEntry {
            canonical_id: filename.to_lowercase(),
            filename,
            title: "Title Not Found".to_string(),
            thumbnail_url: String::new(),
            absolute_path: path.to_string(),
            extraction_method: ExtractionMethod::Fallback,
        }
    }

    #[test]
    fn test_labels() {
        let root = Path::new("/srv/contents");
        assert_eq!(group_label("/srv/contents/a.mp4", root), "Root");
        assert_eq!(group_label("/srv/contents/series/a.mp4", root), "series");
        assert_eq!(group_label("/srv/contents/series/s1/a.mp4", root), "series/s1");
        assert_eq!(group_label("", root), "Other");
        assert_eq!(group_label("a.mp4", root), "Other");
        assert_eq!(group_label("relative/a.mp4", root), "Other");
    }

    #[test]
    fn test_paths_beside_the_root_climb_with_dot_dot() {
        let root = Path::new("/srv/contents");
        assert_eq!(group_label("/srv/archive/a.mp4", root), "../archive");
        assert_eq!(group_label("/srv/a.mp4", root), "..");
        assert_eq!(group_label("/mnt/other/a.mp4", root), "../../mnt/other");
        assert_eq!(group_label("/srv/contents2/x/a.mp4", root), "../contents2/x");
    }

    #[test]
    fn test_root_with_trailing_separator_and_dot() {
        let root = Path::new("/srv/./contents/");
        assert_eq!(group_label("/srv/contents/x/a.mp4", root), "x");
        assert_eq!(group_label("/srv/contents/a.mp4", root), "Root");
    }

    #[test]
    fn test_groups_sorted_and_order_preserved() {
        let entries = vec![
            entry("/srv/contents/z/1.mp4"),
            entry("/srv/contents/a/2.mp4"),
            entry("/srv/contents/3.mp4"),
            entry("/srv/contents/a/4.mp4"),
            entry("/elsewhere/5.mp4"),
        ];
        let groups = group_by_directory(&entries, Path::new("/srv/contents"));
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["../../elsewhere", "Root", "a", "z"]);

        let a = &groups[2];
        let names: Vec<&str> = a.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["2.mp4", "4.mp4"]);
    }

    #[test]
    fn test_partition_law() {
        let entries = vec![
            entry("/srv/contents/a/1.mp4"),
            entry("/srv/contents/a/1.mp4"),
            entry("/srv/contents/b/c/2.mp4"),
            entry("/srv/contents/3.mp4"),
            entry("relative/4.mp4"),
            entry(""),
        ];
        let groups = group_by_directory(&entries, Path::new("/srv/contents"));

        let total: usize = groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, entries.len());

        for original in &entries {
            let hits = groups
                .iter()
                .flat_map(|g| g.entries.iter())
                .filter(|e| std::ptr::eq(**e, original))
                .count();
            assert_eq!(hits, 1, "entry {:?} not in exactly one group", original);
        }
    }

    #[test]
    fn test_empty_catalog_has_no_groups() {
        assert!(group_by_directory(&[], Path::new("/srv")).is_empty());
    }
}
