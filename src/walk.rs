//! Recursive discovery of every regular file under the contents root.
//!
//! No filtering by type, extension, or size: anything that is a file is a
//! candidate catalog row. Errors inside the tree (unreadable directories,
//! symlink loops) are logged and skipped; a missing root is reported before
//! any walking happens.

use anyhow::Result;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::CatalogError;

/// Walker settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    pub follow_symlinks: bool,
}

/// Make `path` absolute against the current directory, dropping `.` segments
/// and folding `..` into its parent.
///
/// Symlinks are left as they are; this is a lexical operation.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// A regular file, or a symlink whose target is one.
///
/// Symlinked directories are only descended into when the walker follows
/// links.
fn is_file_entry(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && std::fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false)
}

/// List the absolute path of every regular file under `root`.
///
/// Within a directory, entries are visited in file-name order.
pub fn walk_files(root: &Path, options: WalkOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CatalogError::RootNotFound(root.to_path_buf()).into());
    }
    let root = absolutize(root)?;

    let mut files = Vec::new();
    let walker = WalkDir::new(&root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let at = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                tracing::warn!("skipping {}: {}", at, e);
                continue;
            }
        };
        if is_file_entry(&entry) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!("discovered {} files under {}", files.len(), root.display());
    Ok(files)
}
