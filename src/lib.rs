//! # DMM Library
//!
//! A local media catalog for files named after release codes.
//!
//! DMM Library walks a contents directory, derives a canonical ID from every
//! filename, predicts the package-art URL, looks up a title through a web
//! search, and writes one CSV row per file. The browsing side loads that CSV,
//! groups entries by directory, and filters them by title, ID, or filename.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────────────┐   ┌───────────┐
//! │  Walker  │──▶│ Canonical ID + URLs   │──▶│  Catalog   │
//! │ (walk)   │   │ Title lookup (title)  │   │  CSV file  │
//! └──────────┘   └───────────────────────┘   └─────┬─────┘
//!                                                  │
//!                           ┌──────────────────────┘
//!                           ▼
//!                  ┌──────────────────┐
//!                  │ Group + Filter   │──▶ browse / search
//!                  └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! dlib build ./contents          # walk, look up titles, write dmm_library.csv
//! dlib search summer             # grouped one-shot search
//! dlib browse                    # interactive view with :play / :open
//! dlib status                    # root, catalog and lookup health
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Catalog error taxonomy |
//! | [`walk`] | Recursive file discovery |
//! | [`title`] | Title resolver trait and implementations |
//! | [`catalog`] | CSV catalog reader and writer |
//! | [`ingest`] | Catalog build pipeline |
//! | [`progress`] | Build progress reporting |
//! | [`browse`] | Interactive view and one-shot search |
//! | [`launch`] | Default-application launchers |
//! | [`status`] | Health report |
//!
//! The pure pieces (data model, canonical IDs, URLs, grouping, filtering)
//! live in the `dmm-library-core` crate.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod launch;
pub mod progress;
pub mod status;
pub mod title;
pub mod walk;
