//! URL handling module for Sitemap-Trail
//!
//! This module provides URL normalization, origin comparison and the
//! filename helpers used to build sitemap source trails.

mod normalize;
mod origin;

use url::Url;

// Re-export main functions
pub use normalize::{normalize_url, resolve_url};
pub use origin::same_origin;

/// Filename used when a sitemap URL has no usable last path segment
pub const DEFAULT_SITEMAP_FILENAME: &str = "sitemap.xml";

/// Returns the filename of a sitemap URL
///
/// This is the last non-empty path segment, or `"sitemap.xml"` when the URL
/// cannot be parsed or has no such segment.
///
/// # Examples
///
/// ```
/// use sitemap_trail::url::sitemap_filename;
///
/// assert_eq!(sitemap_filename("https://example.com/maps/posts.xml"), "posts.xml");
/// assert_eq!(sitemap_filename("https://example.com/"), "sitemap.xml");
/// assert_eq!(sitemap_filename("not a url"), "sitemap.xml");
/// ```
pub fn sitemap_filename(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_SITEMAP_FILENAME.to_string())
}

/// Returns the key under which a crawl of `sitemap_url` is stored
///
/// Results are keyed by the entry sitemap's filename.
pub fn storage_key(sitemap_url: &str) -> String {
    sitemap_filename(sitemap_url)
}
