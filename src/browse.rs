//! Browsing the catalog: the interactive view and one-shot search.
//!
//! The catalog is loaded once, grouped once, and every search term is a pure
//! filter over those groups. Nothing here writes the catalog or touches the
//! network.
//!
//! The interactive view is line oriented. Each input line either sets the
//! search term or, when it starts with `:`, runs a command:
//!
//! | Input | Effect |
//! |-------|--------|
//! | any text | filter by that term (empty line shows everything) |
//! | `:clear` | reset the term |
//! | `:play N` | open entry N with the default media player |
//! | `:open N` | open entry N's content page in the browser |
//! | `:help` | list commands |
//! | `:quit` | leave (EOF works too) |

use anyhow::Result;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use dmm_library_core::filter::filter_groups;
use dmm_library_core::group::{group_by_directory, DirectoryGroup};
use dmm_library_core::models::CatalogEntry;

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::error::CatalogError;
use crate::launch;
use crate::walk::absolutize;

/// Side effects triggered from the view.
pub trait Launcher {
    fn play(&self, entry: &CatalogEntry) -> Result<(), CatalogError>;
    fn open_page(&self, entry: &CatalogEntry) -> Result<(), CatalogError>;
}

/// Uses the desktop's default handlers.
pub struct DesktopLauncher;

impl Launcher for DesktopLauncher {
    fn play(&self, entry: &CatalogEntry) -> Result<(), CatalogError> {
        launch::play_media(&entry.absolute_path)
    }

    fn open_page(&self, entry: &CatalogEntry) -> Result<(), CatalogError> {
        launch::open_content_page(&entry.canonical_id)
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Search(String),
    Clear,
    Play(usize),
    Open(usize),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ViewCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix(':') else {
        return ViewCommand::Search(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let index = parts.next().and_then(|n| n.parse::<usize>().ok());
    match (name, index) {
        ("clear", _) => ViewCommand::Clear,
        ("play", Some(n)) => ViewCommand::Play(n),
        ("open", Some(n)) => ViewCommand::Open(n),
        ("help", _) => ViewCommand::Help,
        ("quit" | "q", _) => ViewCommand::Quit,
        _ => ViewCommand::Unknown(line.to_string()),
    }
}

/// Print the filtered groups and return the visible entries in numbering
/// order (entry `[n]` is `visible[n - 1]`).
pub fn render<'a, W: Write>(
    out: &mut W,
    groups: &[DirectoryGroup<'a>],
    term: &str,
) -> std::io::Result<Vec<&'a CatalogEntry>> {
    let filtered = filter_groups(groups, term);
    let mut visible = Vec::new();

    writeln!(out, "Available contents [LOCAL]")?;
    if !term.is_empty() {
        writeln!(out, "search: {:?}", term)?;
    }
    for group in &filtered {
        writeln!(out)?;
        writeln!(out, "{} ({})", group.label, group.len())?;
        for entry in &group.entries {
            visible.push(*entry);
            writeln!(
                out,
                "  [{}] {:<16} {}  ({})",
                visible.len(),
                entry.canonical_id,
                entry.display_title(),
                entry.filename
            )?;
        }
    }
    writeln!(out)?;
    Ok(visible)
}

fn print_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "type to search by title, ID, or filename")?;
    writeln!(out, "  :play N   open entry N in the default player")?;
    writeln!(out, "  :open N   open entry N's content page")?;
    writeln!(out, "  :clear    show everything")?;
    writeln!(out, "  :quit     leave")
}

/// Run the interactive loop until `:quit` or end of input.
pub fn browse_loop<R: BufRead, W: Write>(
    groups: &[DirectoryGroup<'_>],
    input: R,
    out: &mut W,
    launcher: &dyn Launcher,
) -> Result<()> {
    let mut term = String::new();
    let mut visible = render(out, groups, &term)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            ViewCommand::Quit => break,
            ViewCommand::Search(next) => {
                term = next;
                visible = render(out, groups, &term)?;
            }
            ViewCommand::Clear => {
                term.clear();
                visible = render(out, groups, &term)?;
            }
            ViewCommand::Play(n) | ViewCommand::Open(n) if n == 0 || n > visible.len() => {
                writeln!(out, "no entry [{}] in the current view", n)?;
            }
            ViewCommand::Play(n) => {
                let entry = visible[n - 1];
                match launcher.play(entry) {
                    Ok(()) => writeln!(out, "Starting: {}", entry.filename)?,
                    Err(e) => tracing::warn!("{}", e),
                }
            }
            ViewCommand::Open(n) => {
                let entry = visible[n - 1];
                match launcher.open_page(entry) {
                    Ok(()) => writeln!(out, "Opened content page for {}", entry.canonical_id)?,
                    Err(e) => tracing::warn!("{}", e),
                }
            }
            ViewCommand::Help => print_help(out)?,
            ViewCommand::Unknown(raw) => {
                writeln!(out, "unknown command: {} (try :help)", raw)?;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

fn resolve_paths(
    config: &Config,
    catalog: Option<PathBuf>,
    root: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    let catalog = catalog.unwrap_or_else(|| config.catalog.path.clone());
    let root = absolutize(&root.unwrap_or_else(|| config.catalog.root.clone()))?;
    Ok((catalog, root))
}

/// CLI entry point for `dlib browse`.
pub fn run_browse(config: &Config, catalog: Option<PathBuf>, root: Option<PathBuf>) -> Result<()> {
    let (catalog_path, root) = resolve_paths(config, catalog, root)?;
    let catalog = load_catalog(&catalog_path)?;
    if catalog.is_empty() {
        println!(
            "Catalog {} is empty or missing. Run `dlib build` first.",
            catalog_path.display()
        );
        return Ok(());
    }
    tracing::info!(
        "loaded {} entries ({} skipped) from {}",
        catalog.len(),
        catalog.skipped,
        catalog_path.display()
    );

    let groups = group_by_directory(&catalog.entries, &root);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    browse_loop(&groups, stdin.lock(), &mut stdout, &DesktopLauncher)
}

#[derive(Serialize)]
struct GroupResult<'a> {
    group: &'a str,
    entries: &'a [&'a CatalogEntry],
}

/// CLI entry point for `dlib search`.
pub fn run_search(
    config: &Config,
    term: &str,
    catalog: Option<PathBuf>,
    root: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let (catalog_path, root) = resolve_paths(config, catalog, root)?;
    let catalog = load_catalog(&catalog_path)?;
    let groups = group_by_directory(&catalog.entries, &root);
    let matched: Vec<DirectoryGroup<'_>> = filter_groups(&groups, term)
        .into_iter()
        .filter(|g| !g.is_empty())
        .collect();

    if json {
        let results: Vec<GroupResult<'_>> = matched
            .iter()
            .map(|g| GroupResult {
                group: &g.label,
                entries: &g.entries,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if matched.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for group in &matched {
        println!("{} ({})", group.label, group.len());
        for entry in &group.entries {
            println!(
                "  {:<16} {}  ({})",
                entry.canonical_id,
                entry.display_title(),
                entry.filename
            );
        }
    }
    Ok(())
}
