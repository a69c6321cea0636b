//! Statistics generation from crawl results
//!
//! This module provides functionality for summarizing and displaying a
//! finished crawl: how many URLs each sitemap trail contributed, how deep
//! the HTML crawl reached, and how many errors were recorded.

use crate::state::{CrawlResult, Source};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Entry sitemap URL, if recorded
    pub sitemap_url: Option<String>,

    /// Total number of URLs discovered
    pub total_urls: u64,

    /// URLs first found in a sitemap
    pub sitemap_urls: u64,

    /// URLs first found by the HTML crawl
    pub html_urls: u64,

    /// URL count per sitemap trail
    pub by_source: BTreeMap<String, u64>,

    /// URL count per HTML crawl depth
    pub by_depth: BTreeMap<u32, u64>,

    /// Number of recorded errors
    pub error_count: u64,

    /// Number of warnings in the status log
    pub warning_count: u64,
}

impl CrawlStatistics {
    /// Computes statistics for a crawl result
    pub fn from_result(result: &CrawlResult) -> Self {
        let mut stats = Self {
            sitemap_url: result.sitemap_url.clone(),
            total_urls: result.urls.len() as u64,
            error_count: result.errors.len() as u64,
            warning_count: result
                .status
                .iter()
                .filter(|line| line.starts_with("Warning: "))
                .count() as u64,
            ..Self::default()
        };

        for entry in &result.urls {
            match Source::parse(&entry.source) {
                Source::Sitemap(trail) => {
                    stats.sitemap_urls += 1;
                    *stats.by_source.entry(trail).or_insert(0) += 1;
                }
                Source::HtmlCrawl { depth } => {
                    stats.html_urls += 1;
                    *stats.by_depth.entry(depth).or_insert(0) += 1;
                }
            }
        }

        stats
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    if let Some(url) = &stats.sitemap_url {
        println!("  Sitemap: {}", url);
    }
    println!("  Total URLs discovered: {}", stats.total_urls);
    println!("  From sitemaps: {}", stats.sitemap_urls);
    println!("  From HTML crawl: {}", stats.html_urls);
    println!("  Errors: {}", stats.error_count);
    println!("  Warnings: {}", stats.warning_count);
    println!();

    if !stats.by_source.is_empty() {
        println!("URLs by Sitemap:");
        // Sort sources by count (descending)
        let mut source_counts: Vec<_> = stats.by_source.iter().collect();
        source_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (source, count) in source_counts {
            let percentage = if stats.total_urls > 0 {
                (*count as f64 / stats.total_urls as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", source, count, percentage);
        }
        println!();
    }

    if !stats.by_depth.is_empty() {
        println!("HTML Crawl by Depth:");
        for (depth, count) in &stats.by_depth {
            println!("  {}: {}", Source::HtmlCrawl { depth: *depth }, count);
        }
        println!();
    }
}
