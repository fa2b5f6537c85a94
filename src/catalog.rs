//! The persisted catalog: a UTF-8 CSV file with a byte-order mark.
//!
//! One header row, then one row per entry, columns in
//! [`CATALOG_HEADER`] order. The BOM lets spreadsheet tools pick the right
//! encoding when the file is opened directly.
//!
//! Writing goes through [`CatalogWriter`], which flushes after every row so
//! an interrupted build keeps what it already computed. Reading goes through
//! [`load_catalog`], which treats a missing file as an empty catalog and
//! skips malformed rows with a warning.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dmm_library_core::models::{CatalogEntry, CATALOG_HEADER};

use crate::error::CatalogError;

const BOM: &str = "\u{feff}";

/// Entries read back from a persisted catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
    /// Rows dropped because they could not be parsed.
    pub skipped: usize,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Streaming catalog writer.
pub struct CatalogWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl CatalogWriter<BufWriter<File>> {
    /// Create (or truncate) the catalog file at `path`, creating parent
    /// directories as needed, and write the header.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create catalog directory: {}", parent.display())
                })?;
            }
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create catalog file: {}", path.display()))?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CatalogWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        out.write_all(BOM.as_bytes())?;
        let mut inner = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        inner.write_record(CATALOG_HEADER)?;
        inner.flush()?;
        Ok(Self { inner, rows: 0 })
    }

    /// Append one row and flush it through to the underlying writer.
    pub fn write_entry(&mut self, entry: &CatalogEntry) -> Result<()> {
        self.inner.serialize(entry)?;
        self.inner.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, not counting the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush catalog: {}", e.error()))
    }
}

/// Load the catalog at `path`.
///
/// A missing file is an empty catalog, not an error. The file is read as
/// bytes, so a row with invalid UTF-8 costs only that row.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        tracing::debug!("no catalog at {}, nothing to load", path.display());
        return Ok(Catalog::default());
    }
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    parse_catalog_bytes(&content)
}

/// Parse catalog text. See [`parse_catalog_bytes`].
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    parse_catalog_bytes(content.as_bytes())
}

/// Parse raw catalog bytes. Columns are read by position, so the header's
/// wording does not matter.
pub fn parse_catalog_bytes(content: &[u8]) -> Result<Catalog> {
    let content = content.strip_prefix(BOM.as_bytes()).unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content);

    let headers = reader.byte_headers()?.clone();
    if !headers.is_empty() && !headers.iter().eq(CATALOG_HEADER.iter().map(|h| h.as_bytes())) {
        tracing::warn!(
            "unexpected catalog header {:?}; reading columns by position",
            headers
                .iter()
                .map(String::from_utf8_lossy)
                .collect::<Vec<_>>()
        );
    }

    let mut catalog = Catalog::default();
    for (index, record) in reader.byte_records().enumerate() {
        // header is line 1
        let fallback_line = index as u64 + 2;
        let parsed = record.map_err(|e| (fallback_line, e.to_string())).and_then(|record| {
            let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
            if record.len() < CATALOG_HEADER.len() {
                return Err((
                    line,
                    format!(
                        "expected {} fields, found {}",
                        CATALOG_HEADER.len(),
                        record.len()
                    ),
                ));
            }
            record
                .deserialize::<CatalogEntry>(None)
                .map_err(|e| (line, e.to_string()))
        });

        match parsed {
            Ok(entry) => catalog.entries.push(entry),
            Err((line, reason)) => {
                tracing::warn!("{}; row skipped", CatalogError::MalformedRow { line, reason });
                catalog.skipped += 1;
            }
        }
    }

    Ok(catalog)
}
