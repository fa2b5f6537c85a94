//! Error taxonomy for the catalog pipeline.
//!
//! Only [`CatalogError::RootNotFound`] ends a build. The other variants are
//! recorded per file or per row and the pipeline carries on; they exist so
//! diagnostics name what went wrong in a consistent shape.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("contents root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("title lookup failed for '{canonical_id}': {reason}")]
    LookupFailure {
        canonical_id: String,
        reason: String,
    },

    #[error("malformed catalog row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("could not open '{target}': {reason}")]
    LaunchFailure { target: String, reason: String },
}
