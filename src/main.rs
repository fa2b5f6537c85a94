//! # DMM Library CLI (`dlib`)
//!
//! Builds the catalog from a contents directory and browses it.
//!
//! ## Usage
//!
//! ```bash
//! dlib [--config ./config/dlib.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dlib build [ROOT]` | Walk the root, look up titles, write the catalog |
//! | `dlib browse` | Interactive grouped view with search, play and open |
//! | `dlib search <TERM>` | One-shot grouped search |
//! | `dlib status` | Show root, catalog and lookup health |
//!
//! ## Examples
//!
//! ```bash
//! # Build from ./contents into ./dmm_library.csv
//! dlib build
//!
//! # Build another directory into another file, without progress output
//! dlib build /media/library --output ./library.csv --progress off
//!
//! # See what IDs would be produced, without any lookups
//! dlib build --dry-run
//!
//! # Search as JSON
//! dlib search abc123 --json
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use dmm_library::progress::ProgressMode;
use dmm_library::{browse, config, ingest, status};

const DEFAULT_CONFIG: &str = "./config/dlib.toml";

/// DMM Library: a local media catalog with canonical IDs, title lookup and
/// grouped search.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the default file is absent, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "dlib",
    about = "DMM Library: catalog local media files and browse them by directory",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or refresh the catalog.
    ///
    /// Walks every file under the contents root, derives its canonical ID
    /// and thumbnail URL, looks up a title (one throttled request per file),
    /// and writes the catalog. Ctrl-C stops further lookups and keeps the
    /// rows already written.
    Build {
        /// Contents root. Defaults to `[catalog].root`.
        root: Option<PathBuf>,

        /// Catalog file to write. Defaults to `[catalog].path`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Process at most this many files.
        #[arg(long)]
        limit: Option<usize>,

        /// List discovered files and their IDs without looking anything up
        /// or writing the catalog.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr. Defaults to `human` on a terminal,
        /// `off` otherwise.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Browse the catalog interactively.
    ///
    /// Loads the catalog once, groups entries by directory, and filters as
    /// you type. `:play N` opens a file, `:open N` opens its content page.
    Browse {
        /// Catalog file to read. Defaults to `[catalog].path`.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Contents root used for directory grouping. Defaults to `[catalog].root`.
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Search the catalog once and print matching entries by directory.
    Search {
        /// Case-insensitive substring of the title, ID, or filename.
        term: String,

        #[arg(long)]
        catalog: Option<PathBuf>,

        #[arg(long)]
        root: Option<PathBuf>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show contents root, catalog and lookup status.
    Status,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dmm_library=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let is_default = cli.config == Path::new(DEFAULT_CONFIG);
    let cfg = config::load_or_default(&cli.config, is_default)?;

    match cli.command {
        Commands::Build {
            root,
            output,
            limit,
            dry_run,
            progress,
        } => {
            ingest::run_build(&cfg, root, output, limit, dry_run, progress).await?;
        }
        Commands::Browse { catalog, root } => {
            browse::run_browse(&cfg, catalog, root)?;
        }
        Commands::Search {
            term,
            catalog,
            root,
            json,
        } => {
            browse::run_search(&cfg, &term, catalog, root, json)?;
        }
        Commands::Status => {
            status::run_status(&cfg)?;
        }
    }

    Ok(())
}
