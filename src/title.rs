//! Best-effort title lookup for canonical IDs.
//!
//! Defines the [`TitleResolver`] trait consumed by the catalog builder and
//! two implementations:
//! - **[`DuckDuckGoResolver`]**: scrapes the first organic result from the
//!   DuckDuckGo HTML endpoint, restricted to the configured site.
//! - **[`DisabledResolver`]**: no network; every ID is "not found".
//!
//! A resolver never returns an error. Failures come back as
//! [`TitleLookup::Failed`] and are persisted as [`LOOKUP_ERROR_TITLE`], so
//! the catalog always gets one row per file.
//!
//! Pacing between calls is the builder's job, not the resolver's.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::config::LookupConfig;
use crate::error::CatalogError;

/// Persisted title when the search returned nothing usable.
pub const NOT_FOUND_TITLE: &str = "Title Not Found";

/// Persisted title when the lookup itself failed.
pub const LOOKUP_ERROR_TITLE: &str = "Search Error";

/// Branding token stripped from result titles.
const BRANDING: &str = "FANZA";

/// Outcome of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleLookup {
    Found(String),
    NotFound,
    Failed(String),
}

impl TitleLookup {
    /// The string stored in the catalog's `title` column.
    pub fn into_title(self) -> String {
        match self {
            TitleLookup::Found(title) => title,
            TitleLookup::NotFound => NOT_FOUND_TITLE.to_string(),
            TitleLookup::Failed(_) => LOOKUP_ERROR_TITLE.to_string(),
        }
    }
}

/// True if `title` is one of the lookup sentinels rather than a real title.
pub fn is_sentinel(title: &str) -> bool {
    title == NOT_FOUND_TITLE || title == LOOKUP_ERROR_TITLE
}

/// Resolves a canonical ID to a human title.
///
/// Implementations must not panic or return early with an error; every
/// failure is folded into [`TitleLookup`].
#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Short name used in logs and the build summary.
    fn name(&self) -> &str;

    /// Look up `canonical_id`.
    async fn resolve(&self, canonical_id: &str) -> TitleLookup;

    /// Whether the builder should pause after each call to this resolver.
    fn is_throttled(&self) -> bool {
        true
    }
}

/// Resolver used when lookups are turned off.
pub struct DisabledResolver;

#[async_trait]
impl TitleResolver for DisabledResolver {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn resolve(&self, _canonical_id: &str) -> TitleLookup {
        TitleLookup::NotFound
    }

    fn is_throttled(&self) -> bool {
        false
    }
}

/// Scrapes `a.result__a` from the DuckDuckGo HTML results page.
pub struct DuckDuckGoResolver {
    client: reqwest::Client,
    endpoint: String,
    site: String,
    result_selector: Selector,
}

impl DuckDuckGoResolver {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        let result_selector =
            Selector::parse("a.result__a").map_err(|e| anyhow!("invalid result selector: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            site: config.site.clone(),
            result_selector,
        })
    }

    /// Search query for an ID: `site:<site> <id>`.
    pub fn query_for(&self, canonical_id: &str) -> String {
        format!("site:{} {}", self.site, canonical_id)
    }

    async fn fetch(&self, canonical_id: &str) -> Result<String> {
        let query = self.query_for(canonical_id);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::LookupFailure {
                canonical_id: canonical_id.to_string(),
                reason: format!("search endpoint returned {}", status),
            }
            .into());
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TitleResolver for DuckDuckGoResolver {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn resolve(&self, canonical_id: &str) -> TitleLookup {
        match self.fetch(canonical_id).await {
            Ok(html) => match first_result_title(&html, &self.result_selector) {
                Some(title) => TitleLookup::Found(title),
                None => TitleLookup::NotFound,
            },
            Err(e) => TitleLookup::Failed(e.to_string()),
        }
    }
}

/// Text of the first result anchor, cleaned of site branding.
///
/// Returns `None` when there is no result or the cleaned text is empty.
pub fn first_result_title(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let anchor = document.select(selector).next()?;
    let raw: String = anchor.text().collect();
    let cleaned = clean_title(&raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Keep the part before the first `" - "`, drop the branding token, trim.
///
/// ```
/// use dmm_library::title::clean_title;
///
/// assert_eq!(clean_title("Summer Story - 動画 - FANZA動画"), "Summer Story");
/// ```
pub fn clean_title(raw: &str) -> String {
    let head = raw.split(" - ").next().unwrap_or(raw);
    head.replace(BRANDING, "").trim().to_string()
}

/// Build the resolver named by `config.provider`.
pub fn create_resolver(config: &LookupConfig) -> Result<Box<dyn TitleResolver>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledResolver)),
        "duckduckgo" => Ok(Box::new(DuckDuckGoResolver::new(config)?)),
        other => Err(anyhow!("Unknown lookup provider: {}", other)),
    }
}
