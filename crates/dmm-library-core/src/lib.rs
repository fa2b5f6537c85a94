//! # DMM Library Core
//!
//! Pure catalog logic for DMM Library: the catalog data model, canonical ID
//! extraction, derived URL synthesis, directory grouping, and search filtering.
//!
//! This crate contains no tokio, network, or filesystem I/O. Everything here
//! is a deterministic function over strings, paths, and loaded entries.

pub mod canonical;
pub mod filter;
pub mod group;
pub mod models;
pub mod urls;
