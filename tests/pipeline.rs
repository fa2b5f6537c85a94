//! Library-level tests for the build → load → group → filter pipeline.
//!
//! Title lookups are served by in-test [`TitleResolver`] implementations so
//! nothing here touches the network.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use dmm_library::catalog::load_catalog;
use dmm_library::ingest::{build_catalog, entry_for, BuildOptions};
use dmm_library::progress::NoProgress;
use dmm_library::title::{TitleLookup, TitleResolver, LOOKUP_ERROR_TITLE, NOT_FOUND_TITLE};
use dmm_library::walk::absolutize;
use dmm_library_core::filter::filter_entries;
use dmm_library_core::group::group_by_directory;

// ─── Test Resolvers ─────────────────────────────────────────────────

/// Fails every lookup.
struct FailingResolver;

#[async_trait]
impl TitleResolver for FailingResolver {
    fn name(&self) -> &str {
        "failing"
    }

    async fn resolve(&self, _canonical_id: &str) -> TitleLookup {
        TitleLookup::Failed("connection refused".to_string())
    }
}

/// Answers from a fixed table; unknown IDs are not found.
struct TableResolver {
    titles: Vec<(&'static str, &'static str)>,
    calls: AtomicUsize,
}

impl TableResolver {
    fn new(titles: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            titles,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TitleResolver for TableResolver {
    fn name(&self) -> &str {
        "table"
    }

    async fn resolve(&self, canonical_id: &str) -> TitleLookup {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.titles.iter().find(|(id, _)| *id == canonical_id) {
            Some((_, title)) => TitleLookup::Found(title.to_string()),
            None => TitleLookup::NotFound,
        }
    }
}

/// Raises the abort flag once it has answered `after` lookups.
struct AbortingResolver {
    abort: Arc<AtomicBool>,
    after: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl TitleResolver for AbortingResolver {
    fn name(&self) -> &str {
        "aborting"
    }

    async fn resolve(&self, canonical_id: &str) -> TitleLookup {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.after {
            self.abort.store(true, Ordering::SeqCst);
        }
        TitleLookup::Found(format!("title of {}", canonical_id))
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────

fn setup_contents() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("contents");
    fs::create_dir_all(root.join("series/s1")).unwrap();
    fs::create_dir_all(root.join("misc")).unwrap();

    fs::write(root.join("ABC123_2d.mkv"), b"x").unwrap();
    fs::write(root.join("XYZ999.avi"), b"x").unwrap();
    fs::write(root.join("series/s1/FOO_BARhhb.mp4"), b"x").unwrap();
    fs::write(root.join("series/MIDE001.mp4"), b"x").unwrap();
    fs::write(root.join("misc/readme.txt"), b"x").unwrap();

    (tmp, root)
}

fn fast() -> BuildOptions {
    BuildOptions::default()
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn every_lookup_failing_still_yields_one_row_per_file() {
    let (tmp, root) = setup_contents();
    let output = tmp.path().join("catalog.csv");

    let summary = build_catalog(
        &root,
        &output,
        &FailingResolver,
        &fast(),
        &AtomicBool::new(false),
        &NoProgress,
    )
    .await
    .unwrap();

    assert_eq!(summary.discovered, 5);
    assert_eq!(summary.written, 5);
    assert_eq!(summary.lookup_failures, 5);
    assert!(!summary.aborted);

    let catalog = load_catalog(&output).unwrap();
    assert_eq!(catalog.len(), 5);
    assert!(catalog.entries.iter().all(|e| e.title == LOOKUP_ERROR_TITLE));
}

#[tokio::test]
async fn written_catalog_loads_back_field_for_field() {
    let (tmp, root) = setup_contents();
    let output = tmp.path().join("out/catalog.csv");
    let resolver = TableResolver::new(vec![
        ("abc123", "Summer Story, Part 1"),
        ("foo_bar", "Quoted \"Title\""),
    ]);

    let summary = build_catalog(
        &root,
        &output,
        &resolver,
        &fast(),
        &AtomicBool::new(false),
        &NoProgress,
    )
    .await
    .unwrap();
    assert_eq!(summary.not_found, 3);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 5);

    let catalog = load_catalog(&output).unwrap();
    assert_eq!(catalog.skipped, 0);

    let files = dmm_library::walk::walk_files(&root, Default::default()).unwrap();
    let expected: Vec<_> = files
        .iter()
        .map(|path| {
            let mut entry = entry_for(path, String::new());
            entry.title = match entry.canonical_id.as_str() {
                "abc123" => "Summer Story, Part 1".to_string(),
                "foo_bar" => "Quoted \"Title\"".to_string(),
                _ => NOT_FOUND_TITLE.to_string(),
            };
            entry
        })
        .collect();
    assert_eq!(catalog.entries, expected);
}

#[tokio::test]
async fn empty_root_writes_header_only_catalog() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("contents");
    fs::create_dir_all(&root).unwrap();
    let output = tmp.path().join("catalog.csv");

    let summary = build_catalog(
        &root,
        &output,
        &FailingResolver,
        &fast(),
        &AtomicBool::new(false),
        &NoProgress,
    )
    .await
    .unwrap();
    assert_eq!(summary.written, 0);

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(load_catalog(&output).unwrap().is_empty());
}

#[tokio::test]
async fn abort_stops_lookups_and_keeps_written_rows() {
    let (tmp, root) = setup_contents();
    let output = tmp.path().join("catalog.csv");
    let abort = Arc::new(AtomicBool::new(false));
    let resolver = AbortingResolver {
        abort: Arc::clone(&abort),
        after: 2,
        calls: AtomicUsize::new(0),
    };

    let summary = build_catalog(&root, &output, &resolver, &fast(), &abort, &NoProgress)
        .await
        .unwrap();

    assert!(summary.aborted);
    assert_eq!(summary.discovered, 5);
    assert_eq!(summary.written, 2);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    assert_eq!(load_catalog(&output).unwrap().len(), 2);
}

#[tokio::test]
async fn lookups_are_spaced_by_the_delay() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("contents");
    fs::create_dir_all(&root).unwrap();
    for name in ["a.mp4", "b.mp4", "c.mp4"] {
        fs::write(root.join(name), b"x").unwrap();
    }
    let output = tmp.path().join("catalog.csv");
    let options = BuildOptions {
        delay: Duration::from_millis(40),
        ..BuildOptions::default()
    };

    let started = Instant::now();
    build_catalog(
        &root,
        &output,
        &TableResolver::new(vec![]),
        &options,
        &AtomicBool::new(false),
        &NoProgress,
    )
    .await
    .unwrap();

    // two gaps between three lookups
    assert!(started.elapsed() >= Duration::from_millis(80));
}

#[tokio::test]
async fn loaded_catalog_groups_and_filters() {
    let (tmp, root) = setup_contents();
    let output = tmp.path().join("catalog.csv");
    build_catalog(
        &root,
        &output,
        &TableResolver::new(vec![("xyz999", "Winter Tale")]),
        &fast(),
        &AtomicBool::new(false),
        &NoProgress,
    )
    .await
    .unwrap();

    let catalog = load_catalog(&output).unwrap();
    let root_abs = absolutize(&root).unwrap();
    let groups = group_by_directory(&catalog.entries, &root_abs);

    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Root", "misc", "series", "series/s1"]);

    let grouped: usize = groups.iter().map(|g| g.len()).sum();
    assert_eq!(grouped, catalog.len());

    let root_group = &groups[0];
    let hits = filter_entries(root_group.entries.iter().copied(), "WINTER");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].canonical_id, "xyz999");

    // grouping against a subdirectory labels the rest with `..`
    let series = group_by_directory(&catalog.entries, &root_abs.join("series"));
    let labels: Vec<&str> = series.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["..", "../misc", "Root", "s1"]);

    // a root with no shared anchor puts everything in Other
    let unrelated = group_by_directory(&catalog.entries, Path::new("not/anchored"));
    assert_eq!(unrelated.len(), 1);
    assert_eq!(unrelated[0].label, "Other");
    assert_eq!(unrelated[0].len(), catalog.len());
}
