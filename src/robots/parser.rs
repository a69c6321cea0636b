//! Robots.txt parser implementation
//!
//! This module collects `Sitemap:` directives using the robotstxt crate's
//! parse callbacks. Allow/Disallow rules are not enforced anywhere.

use robotstxt::{parse_robotstxt, RobotsParseHandler};

/// Parse handler that keeps only sitemap directives
#[derive(Debug, Default)]
pub struct SitemapCollector {
    sitemaps: Vec<String>,
}

impl SitemapCollector {
    /// Consumes the collector, returning sitemap values in file order
    pub fn into_sitemaps(self) -> Vec<String> {
        self.sitemaps
    }
}

impl RobotsParseHandler for SitemapCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.sitemaps.push(value.to_string());
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

/// Extracts raw `Sitemap:` values from robots.txt content
///
/// # Arguments
///
/// * `content` - The raw robots.txt file content
///
/// # Returns
///
/// Sitemap values in the order they appear, unvalidated
pub fn extract_sitemaps(content: &str) -> Vec<String> {
    let mut collector = SitemapCollector::default();
    parse_robotstxt(content, &mut collector);
    collector.into_sitemaps()
}
