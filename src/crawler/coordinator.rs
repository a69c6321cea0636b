//! Crawler coordinator - main crawl orchestration logic
//!
//! This module sequences one crawl:
//! - Validating the entry sitemap URL
//! - Resolving the sitemap hierarchy
//! - Optionally crawling HTML links from every sitemap URL
//! - Assembling the final result

use crate::config::{Config, DEFAULT_DELAY_MS};
use crate::crawler::links::{crawl_links, LinkCrawlOptions};
use crate::crawler::sitemap::resolve_sitemap;
use crate::crawler::build_http_client;
use crate::state::{CrawlResult, CrawlState};
use crate::url::{normalize_url, sitemap_filename};
use crate::TrailError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Input for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// Entry sitemap URL
    #[serde(default)]
    pub sitemap_url: String,

    /// Politeness delay in milliseconds (default 500)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,

    /// Follow same-origin HTML links from sitemap URLs (default false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl_html_links: Option<bool>,
}

impl CrawlRequest {
    /// Creates a request for `sitemap_url` with default options
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            sitemap_url: sitemap_url.into(),
            ..Self::default()
        }
    }

    /// Sets the politeness delay
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay = Some(delay_ms);
        self
    }

    /// Enables or disables the HTML link crawl
    pub fn with_html_links(mut self, enabled: bool) -> Self {
        self.crawl_html_links = Some(enabled);
        self
    }

    /// Effective politeness delay
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay.unwrap_or(DEFAULT_DELAY_MS))
    }

    /// Whether the HTML link crawl runs
    pub fn html_links_enabled(&self) -> bool {
        self.crawl_html_links.unwrap_or(false)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    max_depth: u32,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(TrailError)` - Failed to build the HTTP client
    pub fn new(config: &Config) -> Result<Self, TrailError> {
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            max_depth: config.crawler.max_depth,
        })
    }

    /// Runs one crawl to completion
    ///
    /// The only error returned is `TrailError::InvalidInput` for a missing
    /// or malformed entry URL; every failure after that point is recorded in
    /// the result's logs instead.
    pub async fn run(&self, request: &CrawlRequest) -> Result<CrawlResult, TrailError> {
        let raw = request.sitemap_url.trim();
        if raw.is_empty() {
            return Err(TrailError::InvalidInput(
                "sitemap URL is required".to_string(),
            ));
        }

        let entry = normalize_url(raw, None)
            .map_err(|e| TrailError::InvalidInput(format!("invalid sitemap URL '{}': {}", raw, e)))?;
        let entry_str = entry.to_string();

        tracing::info!("Starting crawl of {}", entry_str);
        let start_time = Instant::now();

        let delay = request.delay();
        let mut state = CrawlState::new();
        state.log.status(format!("Starting crawl of {}", entry_str));

        let seed_path = sitemap_filename(&entry_str);
        resolve_sitemap(&self.client, raw, &seed_path, &mut state, delay).await;

        state.log.status(format!(
            "Sitemap phase complete: {} URLs discovered",
            state.discovered.len()
        ));

        if request.html_links_enabled() {
            let seeds = state.discovered.keys();
            state.log.status(format!(
                "Crawling HTML links from {} seed URLs (max depth {})",
                seeds.len(),
                self.max_depth
            ));

            let options = LinkCrawlOptions {
                origin: entry.origin(),
                delay,
                max_depth: self.max_depth,
            };

            for seed in &seeds {
                crawl_links(&self.client, seed, &options, &mut state, 0).await;
            }
        }

        state.log.status(format!(
            "Crawl complete: {} URLs found, {} errors",
            state.discovered.len(),
            state.log.error_lines().len()
        ));

        tracing::info!(
            "Crawl of {} finished in {:.2}s",
            entry_str,
            start_time.elapsed().as_secs_f64()
        );

        Ok(state.into_result(Some(entry_str)))
    }
}

/// Builds a coordinator and runs a single crawl
///
/// This is the one-call entry point used by the CLI.
pub async fn run_crawl(config: &Config, request: &CrawlRequest) -> Result<CrawlResult, TrailError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(request).await
}
