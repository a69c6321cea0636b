//! Recursive sitemap resolution
//!
//! A sitemap is either an index (`<sitemapindex>` of `<sitemap>` entries) or a
//! leaf URL set (`<urlset>` of `<url>` entries). Indexes are expanded depth
//! first, in document order, so the first path to reach a URL is the one that
//! gets recorded.

use crate::crawler::fetcher::{fetch_url, politeness_delay, FetchKind, FetchResult};
use crate::crawler::xml::{extract_loc, parse_document, XmlElement};
use crate::state::{append_source_path, CrawlState, Source};
use crate::url::{normalize_url, resolve_url, sitemap_filename};
use crate::TrailError;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Shape of a parsed sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// Entries reference other sitemaps
    Index,
    /// Entries are page URLs
    Leaf,
    /// Neither shape
    Unrecognized,
}

/// Classifies a sitemap root element
///
/// The root name decides first; a root with an unexpected name is still
/// accepted when its children clearly have one of the two shapes.
pub fn classify(root: &XmlElement) -> SitemapKind {
    match root.name.as_str() {
        "sitemapindex" => SitemapKind::Index,
        "urlset" => SitemapKind::Leaf,
        _ if root.child("sitemap").is_some() => SitemapKind::Index,
        _ if root.child("url").is_some() => SitemapKind::Leaf,
        _ => SitemapKind::Unrecognized,
    }
}

/// Resolves one sitemap and everything reachable from it
///
/// Failures are node-local: they are written to the crawl log and the call
/// returns, leaving sibling sitemaps unaffected.
///
/// # Arguments
///
/// * `client` - HTTP client
/// * `url` - Sitemap URL to fetch
/// * `source_path` - Trail of sitemap filenames that led here
/// * `state` - Shared discovery state
/// * `delay` - Politeness delay before the fetch
pub fn resolve_sitemap<'a>(
    client: &'a Client,
    url: &'a str,
    source_path: &'a str,
    state: &'a mut CrawlState,
    delay: Duration,
) -> BoxFuture<'a, ()> {
    async move {
        // Fetched at the address as given; deduplicated by its normalized form
        let located = resolve_url(url, None)
            .and_then(|target| normalize_url(target.as_str(), None).map(|key| (target, key)));
        let (target, sitemap_url) = match located {
            Ok(pair) => pair,
            Err(e) => {
                state
                    .log
                    .error(format!("Error processing sitemap {}: {}", url, e));
                return;
            }
        };

        if !state.visited_sitemaps.insert(sitemap_url.to_string()) {
            state.log.warn(format!(
                "Sitemap {} was already processed, skipping repeated reference",
                sitemap_url
            ));
            return;
        }

        politeness_delay(delay).await;

        state.log.status(format!("Fetching sitemap: {}", target));

        let root = match fetch_sitemap(client, target.as_str()).await {
            Ok(root) => root,
            Err(e) => {
                state
                    .log
                    .error(format!("Error processing sitemap {}: {}", target, e));
                return;
            }
        };

        match classify(&root) {
            SitemapKind::Index => {
                let children = index_children(&root, &target, state);
                state.log.status(format!(
                    "Found sitemap index {} with {} child sitemaps",
                    target,
                    children.len()
                ));

                for child in children {
                    let child_path = append_source_path(source_path, &sitemap_filename(&child));
                    resolve_sitemap(client, &child, &child_path, state, delay).await;
                }
            }
            SitemapKind::Leaf => {
                let label = if source_path.is_empty() {
                    sitemap_filename(target.as_str())
                } else {
                    source_path.to_string()
                };
                record_leaf(&root, &target, &label, state);
            }
            SitemapKind::Unrecognized => {
                state.log.error(format!(
                    "Unrecognized sitemap format at {}: root element <{}> has no <sitemap> or <url> entries",
                    target, root.name
                ));
            }
        }
    }
    .boxed()
}

/// Fetches and parses a sitemap document
async fn fetch_sitemap(client: &Client, url: &str) -> Result<XmlElement, TrailError> {
    let document = match fetch_url(client, url, FetchKind::Sitemap).await? {
        FetchResult::Success(document) => document,
        // Not produced for sitemap fetches
        FetchResult::ContentMismatch { content_type } => {
            return Err(TrailError::ContentType {
                url: url.to_string(),
                content_type,
            })
        }
    };

    let text = document.text()?;
    parse_document(&text).map_err(|source| TrailError::XmlParse {
        url: url.to_string(),
        source,
    })
}

/// Collects child sitemap URLs from an index, warning on unusable entries
///
/// Children keep their path as written so they are fetched where published.
fn index_children(root: &XmlElement, base: &Url, state: &mut CrawlState) -> Vec<String> {
    let mut children = Vec::new();

    for (position, entry) in root.children_named("sitemap").enumerate() {
        let Some(loc) = extract_loc(entry) else {
            state.log.warn(format!(
                "Sitemap entry {} in {} has no <loc>, skipping",
                position + 1,
                base
            ));
            continue;
        };

        match resolve_url(&loc, Some(base)) {
            Ok(child) => children.push(child.to_string()),
            Err(e) => state.log.warn(format!(
                "Invalid sitemap location '{}' in {}: {}",
                loc, base, e
            )),
        }
    }

    children
}

/// Records every page URL of a leaf sitemap under `label`
fn record_leaf(root: &XmlElement, base: &Url, label: &str, state: &mut CrawlState) {
    let source = Source::Sitemap(label.to_string());
    let mut total = 0usize;
    let mut added = 0usize;

    for (position, entry) in root.children_named("url").enumerate() {
        let Some(loc) = extract_loc(entry) else {
            state.log.warn(format!(
                "URL entry {} in {} has no <loc>, skipping",
                position + 1,
                base
            ));
            continue;
        };

        match normalize_url(&loc, Some(base)) {
            Ok(page) => {
                total += 1;
                if state.discovered.insert_if_absent(page.as_str(), &source) {
                    added += 1;
                }
            }
            Err(e) => state
                .log
                .warn(format!("Invalid URL '{}' in {}: {}", loc, base, e)),
        }
    }

    state.log.status(format!(
        "Processed sitemap {}: {} URLs ({} new)",
        base, total, added
    ));
}
