//! HTML link extraction
//!
//! This module parses one HTML page and returns the same-origin links it
//! contains, already normalized so they can be used as discovery-map keys.

use crate::url::{normalize_url, same_origin};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::{Origin, Url};

/// Extracts deduplicated same-origin links from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags, including `download` and `nofollow` anchors
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that fails normalization or lives on another origin
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The page's own URL, used to resolve relative links
/// * `origin` - Only links on this origin are returned
///
/// # Returns
///
/// Normalized absolute URLs in first-occurrence order
///
/// # Example
///
/// ```
/// use sitemap_trail::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about/">About</a><a href="https://other.com/">Other</a>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(html, &page, &page.origin());
/// assert_eq!(links, vec!["https://example.com/about".to_string()]);
/// ```
pub fn extract_links(html: &str, page_url: &Url, origin: &Origin) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in candidate_hrefs(&document) {
        let Some(url) = resolve_link(&href, page_url) else {
            continue;
        };

        if !same_origin(&url, origin) {
            continue;
        }

        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    links
}

/// Collects raw href values from anchors
fn candidate_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only hrefs
/// - Invalid or non-HTTP(S) URLs
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    normalize_url(href, Some(base_url)).ok()
}
