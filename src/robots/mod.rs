//! Robots.txt handling module
//!
//! This module discovers a site's sitemaps from the `Sitemap:` directives in
//! its robots.txt file.

mod parser;

pub use parser::{extract_sitemaps, SitemapCollector};

use crate::crawler::{fetch_url, FetchKind, FetchResult};
use crate::url::{normalize_url, DEFAULT_SITEMAP_FILENAME};
use crate::{TrailError, UrlError};
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Returns the robots.txt URL for the origin of `site_url`
pub fn robots_url(site_url: &Url) -> Result<Url, TrailError> {
    site_url
        .join("/robots.txt")
        .map_err(|e| UrlError::Parse(e.to_string()).into())
}

/// Returns the conventional sitemap location for the origin of `site_url`
pub fn default_sitemap_url(site_url: &Url) -> Result<Url, TrailError> {
    site_url
        .join(&format!("/{}", DEFAULT_SITEMAP_FILENAME))
        .map_err(|e| UrlError::Parse(e.to_string()).into())
}

/// Fetches robots.txt for a site and returns its sitemap URLs
///
/// Relative values are resolved against the robots.txt URL; values that do
/// not normalize are skipped. A missing robots.txt (404) yields an empty list.
///
/// # Arguments
///
/// * `client` - HTTP client
/// * `site_url` - Any URL on the site
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Normalized, deduplicated sitemap URLs in file order
/// * `Err(TrailError)` - Invalid site URL or robots.txt fetch failure
pub async fn discover_sitemaps(client: &Client, site_url: &str) -> Result<Vec<String>, TrailError> {
    let site = normalize_url(site_url, None)
        .map_err(|e| TrailError::InvalidInput(format!("invalid site URL '{}': {}", site_url, e)))?;
    let robots = robots_url(&site)?;

    tracing::info!("Fetching {}", robots);

    let document = match fetch_url(client, robots.as_str(), FetchKind::Robots).await {
        Ok(FetchResult::Success(document)) => document,
        Ok(FetchResult::ContentMismatch { .. }) => return Ok(Vec::new()),
        Err(TrailError::HttpStatus { status: 404, .. }) => {
            tracing::info!("No robots.txt at {}", robots);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let content = document.text()?;

    let mut seen = HashSet::new();
    let mut sitemaps = Vec::new();
    for raw in extract_sitemaps(&content) {
        match normalize_url(&raw, Some(&robots)) {
            Ok(url) => {
                let url = url.to_string();
                if seen.insert(url.clone()) {
                    sitemaps.push(url);
                }
            }
            Err(e) => tracing::warn!("Ignoring sitemap directive '{}': {}", raw, e),
        }
    }

    tracing::info!("Found {} sitemaps in {}", sitemaps.len(), robots);
    Ok(sitemaps)
}
