//! Hand files and URLs to the desktop's default handlers.
//!
//! Both actions are fire-and-report: a failure is returned as
//! [`CatalogError::LaunchFailure`] for the caller to log, and never ends the
//! browsing session.

use std::ffi::OsStr;
use std::process::{Command, ExitStatus};

use dmm_library_core::urls::content_page_url;

use crate::error::CatalogError;

/// Open a media file with the default application.
pub fn play_media(absolute_path: &str) -> Result<(), CatalogError> {
    if absolute_path.is_empty() {
        return Err(CatalogError::LaunchFailure {
            target: absolute_path.to_string(),
            reason: "entry has no stored path".to_string(),
        });
    }
    open_native(absolute_path)
}

/// Open the content page for `canonical_id` in the default browser.
pub fn open_content_page(canonical_id: &str) -> Result<(), CatalogError> {
    if canonical_id.is_empty() {
        return Err(CatalogError::LaunchFailure {
            target: String::new(),
            reason: "entry has no canonical id".to_string(),
        });
    }
    open_native(&content_page_url(canonical_id))
}

fn ensure_command_success(status: ExitStatus, target: &str, label: &str) -> Result<(), CatalogError> {
    if status.success() {
        Ok(())
    } else {
        Err(CatalogError::LaunchFailure {
            target: target.to_string(),
            reason: format!("{} exited with {}", label, status),
        })
    }
}

fn run_opener<I, S>(program: &str, args: I, target: &str) -> Result<(), CatalogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|error| CatalogError::LaunchFailure {
            target: target.to_string(),
            reason: format!("failed to run {}: {}", program, error),
        })?;
    ensure_command_success(status, target, program)
}

#[cfg(target_os = "macos")]
fn open_native(target: &str) -> Result<(), CatalogError> {
    run_opener("open", [target], target)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_native(target: &str) -> Result<(), CatalogError> {
    run_opener("xdg-open", [target], target)
}

#[cfg(target_os = "windows")]
fn open_native(target: &str) -> Result<(), CatalogError> {
    run_opener("cmd", ["/C", "start", "", target], target)
}

#[cfg(not(any(unix, target_os = "windows")))]
fn open_native(target: &str) -> Result<(), CatalogError> {
    Err(CatalogError::LaunchFailure {
        target: target.to_string(),
        reason: "opening files is not supported on this platform".to_string(),
    })
}
