//! Output module for crawl summaries and exports
//!
//! This module handles:
//! - Generating markdown summaries of crawl results
//! - Exporting results as JSON
//! - Computing and printing crawl statistics

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};

use crate::state::CrawlResult;
use crate::TrailError;
use std::io::Write;

/// Writes a crawl result as pretty-printed JSON
///
/// The field names match the serialized `CrawlResult`
/// (`urls`, `status`, `errors`, `sitemapUrl`).
pub fn write_json<W: Write>(result: &CrawlResult, mut writer: W) -> Result<(), TrailError> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
