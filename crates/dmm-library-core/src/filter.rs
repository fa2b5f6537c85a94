//! Case-insensitive substring search over loaded catalog entries.
//!
//! An entry matches when its title, canonical ID, or filename contains the
//! term. The empty term matches everything. Filtering never reorders entries.

use crate::group::DirectoryGroup;
use crate::models::CatalogEntry;

/// True if `entry` matches `term` (already lowercased).
fn matches_lowered(entry: &CatalogEntry, term: &str) -> bool {
    entry.title.to_lowercase().contains(term)
        || entry.canonical_id.to_lowercase().contains(term)
        || entry.filename.to_lowercase().contains(term)
}

/// True if `entry` matches `term`, ignoring case.
pub fn matches(entry: &CatalogEntry, term: &str) -> bool {
    term.is_empty() || matches_lowered(entry, &term.to_lowercase())
}

/// Entries from `entries` that match `term`, in input order.
pub fn filter_entries<'a, I>(entries: I, term: &str) -> Vec<&'a CatalogEntry>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    if term.is_empty() {
        return entries.into_iter().collect();
    }
    let term = term.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| matches_lowered(entry, &term))
        .collect()
}

/// Apply [`filter_entries`] to every group.
///
/// Groups left empty by the term are kept, so a view can still show
/// `label (0)`.
pub fn filter_groups<'a>(groups: &[DirectoryGroup<'a>], term: &str) -> Vec<DirectoryGroup<'a>> {
    groups
        .iter()
        .map(|group| DirectoryGroup {
            label: group.label.clone(),
            entries: filter_entries(group.entries.iter().copied(), term),
        })
        .collect()
}
