//! `dlib status`: a quick health check of the configured paths.
//!
//! Reports whether the contents root exists and whether the catalog loads,
//! with its row, skipped and untitled counts. It also reports whether title
//! lookups are enabled.

use anyhow::Result;

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::title::is_sentinel;
use crate::walk::absolutize;

/// Health of one configured item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub item: &'static str,
    pub status: String,
    pub detail: String,
}

pub fn get_status(config: &Config) -> Result<Vec<StatusLine>> {
    let root = absolutize(&config.catalog.root)?;
    let root_status = if root.is_dir() { "OK" } else { "MISSING" };

    let catalog_path = &config.catalog.path;
    let (catalog_status, catalog_detail) = if catalog_path.exists() {
        let catalog = load_catalog(catalog_path)?;
        let untitled = catalog
            .entries
            .iter()
            .filter(|e| is_sentinel(&e.title))
            .count();
        (
            "OK",
            format!(
                "{} ({} rows, {} skipped, {} untitled)",
                catalog_path.display(),
                catalog.len(),
                catalog.skipped,
                untitled
            ),
        )
    } else {
        ("MISSING", format!("{} (run `dlib build`)", catalog_path.display()))
    };

    let lookup_status = if config.lookup.is_enabled() {
        "ENABLED"
    } else {
        "DISABLED"
    };

    Ok(vec![
        StatusLine {
            item: "root",
            status: root_status.to_string(),
            detail: root.display().to_string(),
        },
        StatusLine {
            item: "catalog",
            status: catalog_status.to_string(),
            detail: catalog_detail,
        },
        StatusLine {
            item: "lookup",
            status: lookup_status.to_string(),
            detail: format!(
                "{} site:{} delay {}ms",
                config.lookup.provider, config.lookup.site, config.lookup.delay_ms
            ),
        },
    ])
}

pub fn run_status(config: &Config) -> Result<()> {
    println!("{:<10} {:<10} DETAIL", "ITEM", "STATUS");
    for line in get_status(config)? {
        println!("{:<10} {:<10} {}", line.item, line.status, line.detail);
    }
    Ok(())
}
