//! Depth-bounded HTML link crawl
//!
//! Starting from sitemap seeds, pages are fetched one at a time and their
//! same-origin links followed until the depth budget runs out. A visited set
//! guarantees each page is fetched at most once per crawl.

use crate::crawler::fetcher::{fetch_url, politeness_delay, FetchKind, FetchResult};
use crate::crawler::parser::extract_links;
use crate::state::{CrawlState, Source};
use crate::url::{normalize_url, resolve_url};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use std::time::Duration;
use url::{Origin, Url};

/// Settings shared by every step of one HTML crawl
#[derive(Debug, Clone)]
pub struct LinkCrawlOptions {
    /// Only links on this origin are followed
    pub origin: Origin,

    /// Politeness delay before each fetch
    pub delay: Duration,

    /// Pages at this depth or deeper are not fetched
    pub max_depth: u32,
}

/// Crawls `url` and the same-origin pages reachable from it
///
/// # Algorithm
///
/// 1. Stop silently when `depth >= max_depth`
/// 2. Stop when the URL does not normalize or was already visited
/// 3. Mark visited, then wait out the delay and fetch
/// 4. Non-HTML responses and fetch failures are logged and end this branch
/// 5. Record the page if it is new (`HTML_CRAWL:sitemap` at depth 0,
///    `HTML_CRAWL:depth_N` otherwise)
/// 6. Follow each extracted link at `depth + 1`, sequentially
pub fn crawl_links<'a>(
    client: &'a Client,
    url: &'a str,
    options: &'a LinkCrawlOptions,
    state: &'a mut CrawlState,
    depth: u32,
) -> BoxFuture<'a, ()> {
    async move {
        if depth >= options.max_depth {
            return;
        }

        // Fetched at the address as given; visited and recorded by its normalized form
        let Ok(page_url) = resolve_url(url, None) else {
            return;
        };
        let Ok(key) = normalize_url(page_url.as_str(), None).map(|u| u.to_string()) else {
            return;
        };

        // Marked before the fetch so a repeated link in the same subtree is a no-op
        if !state.visited_pages.insert(key.clone()) {
            return;
        }

        politeness_delay(options.delay).await;

        tracing::debug!("Crawling {} at depth {}", key, depth);

        let document = match fetch_url(client, page_url.as_str(), FetchKind::Page).await {
            Ok(FetchResult::Success(document)) => document,
            Ok(FetchResult::ContentMismatch { content_type }) => {
                state.log.status(format!(
                    "Skipping non-HTML content at {} ({})",
                    key,
                    if content_type.is_empty() {
                        "no content type"
                    } else {
                        content_type.as_str()
                    }
                ));
                return;
            }
            Err(e) => {
                state.log.error(format!("Error crawling {}: {}", key, e));
                return;
            }
        };

        state
            .discovered
            .insert_if_absent(&key, &Source::HtmlCrawl { depth });

        let links = {
            // Redirect targets resolve relative links
            let base = Url::parse(&document.final_url).unwrap_or_else(|_| page_url.clone());
            let html = String::from_utf8_lossy(&document.body);
            extract_links(&html, &base, &options.origin)
        };

        for link in links {
            crawl_links(client, &link, options, state, depth + 1).await;
        }
    }
    .boxed()
}
