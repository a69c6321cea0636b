//! Discovery state for a single crawl
//!
//! The crawl owns exactly one `CrawlState`. It is handed by `&mut` to the
//! sitemap resolver and the HTML crawler in turn, so there is only ever one
//! writer.

mod discovery;
mod log;
mod source;

pub use discovery::DiscoveryMap;
pub use log::CrawlLog;
pub use source::{append_source_path, Source, HTML_CRAWL_PREFIX, SOURCE_DELIMITER};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A discovered URL and how it was first reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Canonical absolute URL
    pub url: String,

    /// Provenance trail, see [`Source`]
    pub source: String,
}

/// Final output of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Discovered URLs in discovery order
    pub urls: Vec<UrlEntry>,

    /// Ordered progress log
    pub status: Vec<String>,

    /// Ordered log of recoverable failures
    pub errors: Vec<String>,

    /// The entry sitemap URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap_url: Option<String>,
}

/// Mutable state shared by both traversal phases
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Canonical URL -> first recorded entry
    pub discovered: DiscoveryMap,

    /// Pages already dispatched to the HTML crawler
    pub visited_pages: HashSet<String>,

    /// Sitemaps already fetched
    pub visited_sitemaps: HashSet<String>,

    /// Status and error logs
    pub log: CrawlLog,
}

impl CrawlState {
    /// Creates empty state for a new crawl
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes the state into a result
    pub fn into_result(self, sitemap_url: Option<String>) -> CrawlResult {
        let (status, errors) = self.log.into_parts();
        CrawlResult {
            urls: self.discovered.into_entries(),
            status,
            errors,
            sitemap_url,
        }
    }
}
