//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including per-sitemap counts, HTML crawl depth, and error reports.

use crate::output::stats::CrawlStatistics;
use crate::state::{CrawlResult, Source};
use crate::TrailError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// URLs listed in the summary before it is truncated
const MAX_LISTED_URLS: usize = 100;

/// Generates a markdown summary of a crawl result
///
/// # Arguments
///
/// * `result` - The finished crawl
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(TrailError)` - Failed to write summary
pub fn generate_markdown_summary(result: &CrawlResult, output_path: &Path) -> Result<(), TrailError> {
    let markdown = format_markdown_summary(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl result as markdown
///
/// # Arguments
///
/// * `result` - The finished crawl
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(result: &CrawlResult) -> String {
    let stats = CrawlStatistics::from_result(result);
    let mut md = String::new();

    // Title
    md.push_str("# Sitemap-Trail Crawl Summary\n\n");

    if let Some(url) = &stats.sitemap_url {
        md.push_str(&format!("- **Sitemap**: {}\n\n", url));
    }

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", stats.total_urls));
    md.push_str(&format!("- **From Sitemaps**: {}\n", stats.sitemap_urls));
    md.push_str(&format!("- **From HTML Crawl**: {}\n", stats.html_urls));
    md.push_str(&format!("- **Errors**: {}\n", stats.error_count));
    md.push_str(&format!("- **Warnings**: {}\n\n", stats.warning_count));

    // Source breakdown
    if !stats.by_source.is_empty() {
        md.push_str("## URLs by Sitemap\n\n");
        md.push_str("| Source | URLs |\n");
        md.push_str("|--------|------|\n");
        for (source, count) in &stats.by_source {
            md.push_str(&format!("| {} | {} |\n", escape_cell(source), count));
        }
        md.push('\n');
    }

    // Depth breakdown
    if !stats.by_depth.is_empty() {
        md.push_str("## HTML Crawl Depth Breakdown\n\n");
        md.push_str("| Source | URLs |\n");
        md.push_str("|--------|------|\n");
        for (depth, count) in &stats.by_depth {
            md.push_str(&format!(
                "| {} | {} |\n",
                Source::HtmlCrawl { depth: *depth },
                count
            ));
        }
        md.push('\n');
    }

    // Errors
    if !result.errors.is_empty() {
        md.push_str("## Errors\n\n");
        for error in &result.errors {
            md.push_str(&format!("- {}\n", error));
        }
        md.push('\n');
    }

    // Discovered URLs
    if !result.urls.is_empty() {
        md.push_str("## Discovered URLs\n\n");
        md.push_str("| URL | Source |\n");
        md.push_str("|-----|--------|\n");
        for entry in result.urls.iter().take(MAX_LISTED_URLS) {
            md.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&entry.url),
                escape_cell(&entry.source)
            ));
        }
        if result.urls.len() > MAX_LISTED_URLS {
            md.push_str(&format!(
                "\n_... and {} more_\n",
                result.urls.len() - MAX_LISTED_URLS
            ));
        }
        md.push('\n');
    }

    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
