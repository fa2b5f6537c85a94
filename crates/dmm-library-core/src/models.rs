//! Core data models shared by the catalog builder, loader, and view.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of the persisted catalog.
pub const CATALOG_HEADER: [&str; 6] = [
    "filename",
    "canonicalId",
    "title",
    "thumbnailUrl",
    "absolutePath",
    "extractionMethod",
];

/// Which extraction strategy produced a canonical ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Suffix and separator heuristics applied to the bare filename.
    Fallback,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog row: a discovered media file and everything derived from it.
///
/// Field names serialize in camelCase so the persisted header matches
/// [`CATALOG_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Base name of the file as found on disk.
    pub filename: String,
    /// Lowercase, extension-stripped identifier.
    pub canonical_id: String,
    /// Display title, or one of the lookup sentinels.
    pub title: String,
    /// Predicted thumbnail URL (never fetched at build time).
    pub thumbnail_url: String,
    /// Absolute path recorded at build time. May be stale.
    pub absolute_path: String,
    pub extraction_method: ExtractionMethod,
}

impl CatalogEntry {
    /// Text shown for this entry: the title, or the filename when the title is empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.filename
        } else {
            &self.title
        }
    }
}
