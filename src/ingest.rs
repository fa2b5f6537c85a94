//! Catalog build pipeline.
//!
//! Coordinates the full build: walk → canonicalize → synthesize URLs →
//! resolve title → write row. Runs sequentially with a fixed pause after
//! every throttled lookup so the search service is never hammered.
//!
//! Title lookup failures never stop the run: the row is written with a
//! sentinel title and the failure is logged. Each row is flushed as soon as
//! it is written, and an abort request stops further lookups while keeping
//! the rows already on disk.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dmm_library_core::canonical::canonicalize;
use dmm_library_core::models::CatalogEntry;
use dmm_library_core::urls::thumbnail_url;

use crate::catalog::CatalogWriter;
use crate::config::Config;
use crate::error::CatalogError;
use crate::progress::{BuildProgressEvent, BuildProgressReporter, ProgressMode};
use crate::title::{create_resolver, TitleLookup, TitleResolver};
use crate::walk::{absolutize, walk_files, WalkOptions};

/// Knobs for one build run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Pause after each throttled lookup.
    pub delay: Duration,
    /// Process at most this many discovered files.
    pub limit: Option<usize>,
    pub follow_symlinks: bool,
}

/// What a build run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub discovered: usize,
    pub written: usize,
    pub not_found: usize,
    pub lookup_failures: usize,
    pub aborted: bool,
}

/// Everything about a file except its title.
pub fn entry_for(path: &Path, title: String) -> CatalogEntry {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let canonical = canonicalize(&filename);
    CatalogEntry {
        thumbnail_url: thumbnail_url(&canonical.id),
        canonical_id: canonical.id,
        filename,
        title,
        absolute_path: path.display().to_string(),
        extraction_method: canonical.method,
    }
}

/// Files the build would process, in walk order.
///
/// The catalog file itself is left out when it lives under the root.
pub fn discover(root: &Path, output: &Path, options: &BuildOptions) -> Result<Vec<PathBuf>> {
    let mut files = walk_files(
        root,
        WalkOptions {
            follow_symlinks: options.follow_symlinks,
        },
    )?;
    let output = absolutize(output)?;
    files.retain(|p| p != &output);
    if let Some(limit) = options.limit {
        files.truncate(limit);
    }
    Ok(files)
}

/// Build the catalog for `root` into `output`.
///
/// A missing root fails before `output` is touched, so an existing catalog
/// survives a mistyped root.
pub async fn build_catalog(
    root: &Path,
    output: &Path,
    resolver: &dyn TitleResolver,
    options: &BuildOptions,
    abort: &AtomicBool,
    progress: &dyn BuildProgressReporter,
) -> Result<BuildSummary> {
    progress.report(BuildProgressEvent::Discovering {
        root: root.display().to_string(),
    });
    let files = discover(root, output, options)?;

    let mut writer = CatalogWriter::create(output)?;
    let mut summary = BuildSummary {
        discovered: files.len(),
        ..BuildSummary::default()
    };
    let total = files.len() as u64;

    for (i, path) in files.iter().enumerate() {
        if abort.load(Ordering::SeqCst) {
            tracing::warn!(
                "build aborted after {} of {} files; remaining lookups skipped",
                summary.written,
                files.len()
            );
            summary.aborted = true;
            break;
        }

        let mut entry = entry_for(path, String::new());
        progress.report(BuildProgressEvent::Resolving {
            n: i as u64 + 1,
            total,
            canonical_id: entry.canonical_id.clone(),
        });

        let lookup = resolver.resolve(&entry.canonical_id).await;
        match &lookup {
            TitleLookup::Found(_) => {}
            TitleLookup::NotFound => summary.not_found += 1,
            TitleLookup::Failed(reason) => {
                summary.lookup_failures += 1;
                tracing::warn!(
                    "{} ({}); writing sentinel title",
                    CatalogError::LookupFailure {
                        canonical_id: entry.canonical_id.clone(),
                        reason: reason.clone(),
                    },
                    path.display()
                );
            }
        }
        entry.title = lookup.into_title();

        writer.write_entry(&entry)?;
        summary.written += 1;

        let is_last = i + 1 == files.len();
        if resolver.is_throttled() && !is_last && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    writer.finish()?;
    Ok(summary)
}

/// CLI entry point for `dlib build`.
pub async fn run_build(
    config: &Config,
    root: Option<PathBuf>,
    output: Option<PathBuf>,
    limit: Option<usize>,
    dry_run: bool,
    progress: Option<ProgressMode>,
) -> Result<()> {
    let root = root.unwrap_or_else(|| config.catalog.root.clone());
    let output = output.unwrap_or_else(|| config.catalog.path.clone());
    let options = BuildOptions {
        delay: Duration::from_millis(config.lookup.delay_ms),
        limit,
        follow_symlinks: config.catalog.follow_symlinks,
    };

    if dry_run {
        let files = discover(&root, &output, &options)?;
        println!("build {} (dry-run)", root.display());
        println!("  files found: {}", files.len());
        for path in &files {
            let entry = entry_for(path, String::new());
            println!("  {:<20} {}", entry.canonical_id, entry.filename);
        }
        return Ok(());
    }

    let resolver = create_resolver(&config.lookup)?;
    let reporter = progress.unwrap_or_else(ProgressMode::default_for_tty).reporter();

    let abort = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&abort);
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("interrupt received; finishing current lookup and stopping");
            flag.store(true, Ordering::SeqCst);
        }
    });

    tracing::info!(
        "building catalog from {} with {} lookups",
        root.display(),
        resolver.name()
    );
    let result = build_catalog(
        &root,
        &output,
        resolver.as_ref(),
        &options,
        &abort,
        reporter.as_ref(),
    )
    .await;
    watcher.abort();
    let summary = result?;

    println!("build {}", root.display());
    println!("  discovered: {} files", summary.discovered);
    println!("  rows written: {}", summary.written);
    println!("  titles not found: {}", summary.not_found);
    println!("  lookup errors: {}", summary.lookup_failures);
    println!("  catalog: {}", output.display());
    if summary.aborted {
        println!("aborted");
    } else {
        println!("ok");
    }

    Ok(())
}
