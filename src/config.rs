//! TOML configuration.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults below. [`load_config`] parses and validates a file, and
//! [`Config::default`] is used when the default config path does not exist.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Contents root: walked by `build`, reference point for grouping.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Persisted catalog file.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            path: default_catalog_path(),
            follow_symlinks: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./contents")
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("./dmm_library.csv")
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_site")]
    pub site: String,
    /// Pause after every lookup, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            site: default_site(),
            delay_ms: default_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_provider() -> String {
    "duckduckgo".to_string()
}
fn default_endpoint() -> String {
    "https://duckduckgo.com/html/".to_string()
}
fn default_site() -> String {
    "dmm.co.jp".to_string()
}
fn default_delay_ms() -> u64 {
    1500
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

impl LookupConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load `path`, or fall back to defaults when `path` is the built-in default
/// location and nothing is there.
pub fn load_or_default(path: &Path, is_default_path: bool) -> Result<Config> {
    if is_default_path && !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config(path)
}

fn validate(config: &Config) -> Result<()> {
    let lookup = &config.lookup;

    match lookup.provider.as_str() {
        "duckduckgo" | "disabled" => {}
        other => bail!(
            "Unknown lookup provider: '{}'. Must be duckduckgo or disabled.",
            other
        ),
    }

    if lookup.is_enabled() {
        if lookup.timeout_secs == 0 {
            bail!("lookup.timeout_secs must be > 0");
        }
        if !(lookup.endpoint.starts_with("http://") || lookup.endpoint.starts_with("https://")) {
            bail!("lookup.endpoint must be an http(s) URL, got '{}'", lookup.endpoint);
        }
        if lookup.site.trim().is_empty() {
            bail!("lookup.site must not be empty");
        }
    }

    Ok(())
}
