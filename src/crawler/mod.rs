//! Crawler module for sitemap and link discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with per-kind content gating
//! - Sitemap parsing and recursive index resolution
//! - HTML parsing and link extraction
//! - The depth-bounded link crawl
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod links;
mod parser;
mod sitemap;
pub mod xml;

pub use coordinator::{run_crawl, Coordinator, CrawlRequest};
pub use fetcher::{build_http_client, fetch_url, is_html, FetchKind, FetchResult, FetchedDocument};
pub use links::{crawl_links, LinkCrawlOptions};
pub use parser::extract_links;
pub use sitemap::{classify, resolve_sitemap, SitemapKind};
