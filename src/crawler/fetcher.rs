//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent, timeout and
//!   redirect cap
//! - GET requests with per-kind Accept headers
//! - Content-Type gating for HTML pages
//! - Error classification
//! - Transparent gunzip of `.xml.gz` sitemaps
//! - A size cap on response bodies, before and after gunzip

use crate::config::Config;
use crate::TrailError;
use flate2::read::GzDecoder;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::io::Read;
use std::time::Duration;

const SITEMAP_ACCEPT: &str = "application/xml, text/xml;q=0.9, */*;q=0.8";
const PAGE_ACCEPT: &str = "text/html, application/xhtml+xml;q=0.9, */*;q=0.8";
const ROBOTS_ACCEPT: &str = "text/plain, */*;q=0.8";

/// Largest body accepted, compressed or inflated (the sitemap protocol's 50 MB)
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// What is being fetched; decides headers and content gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// A sitemap document; any content type is accepted
    Sitemap,
    /// An HTML page; non-HTML responses are reported as a mismatch
    Page,
    /// A robots.txt file
    Robots,
}

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final URL after redirects
    pub final_url: String,
    /// Content-Type header value
    pub content_type: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchedDocument {
    /// Decodes the body as text, inflating gzip payloads first
    ///
    /// Inflated output larger than `MAX_BODY_BYTES` is an error.
    pub fn text(&self) -> Result<String, std::io::Error> {
        let bytes = maybe_gunzip(&self.body, MAX_BODY_BYTES)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Result of a fetch operation that reached the server
#[derive(Debug)]
pub enum FetchResult {
    /// The document was fetched
    Success(FetchedDocument),

    /// A page fetch returned something other than HTML
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitemap_trail::config::Config;
/// use sitemap_trail::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.crawler.request_timeout_ms);

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(config.crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// 1. Send GET with the Accept header for `kind`
/// 2. Redirects are followed by the client up to its configured cap
/// 3. Final status must be 2xx or 3xx
/// 4. For pages, the Content-Type must be HTML before the body is read
/// 5. The body is read up to `MAX_BODY_BYTES`
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout | `TrailError::Timeout` |
/// | Redirect chain over the cap | `TrailError::RedirectLimit` |
/// | Final status outside 2xx–3xx | `TrailError::HttpStatus` |
/// | Body over `MAX_BODY_BYTES` | `TrailError::BodyTooLarge` |
/// | Anything else (DNS, refused, TLS, body) | `TrailError::Http` |
pub async fn fetch_url(client: &Client, url: &str, kind: FetchKind) -> Result<FetchResult, TrailError> {
    let accept = match kind {
        FetchKind::Sitemap => SITEMAP_ACCEPT,
        FetchKind::Page => PAGE_ACCEPT,
        FetchKind::Robots => ROBOTS_ACCEPT,
    };

    let response = client
        .get(url)
        .header(ACCEPT, accept)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return Err(TrailError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if kind == FetchKind::Page && !is_html(&content_type) {
        return Ok(FetchResult::ContentMismatch { content_type });
    }

    let body = read_body(response, url, MAX_BODY_BYTES).await?;

    Ok(FetchResult::Success(FetchedDocument {
        final_url,
        content_type,
        body,
    }))
}

/// Reads a response body chunk by chunk, failing once it passes `limit`
async fn read_body(
    mut response: reqwest::Response,
    url: &str,
    limit: usize,
) -> Result<Vec<u8>, TrailError> {
    let too_large = || TrailError::BodyTooLarge {
        url: url.to_string(),
        limit,
    };

    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(url, e))? {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Waits out the politeness delay before a request
pub async fn politeness_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Returns true for HTML content types
///
/// A missing Content-Type is not treated as HTML.
pub fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

fn classify_error(url: &str, error: reqwest::Error) -> TrailError {
    if error.is_timeout() {
        TrailError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_redirect() {
        TrailError::RedirectLimit {
            url: url.to_string(),
        }
    } else {
        TrailError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Inflates gzip payloads, passing anything else through unchanged
///
/// Inflation stops with `InvalidData` once the output passes `limit`.
fn maybe_gunzip(bytes: &[u8], limit: usize) -> Result<Vec<u8>, std::io::Error> {
    if bytes.len() >= 2 && bytes[0] == 0x1F && bytes[1] == 0x8B {
        let mut out = Vec::new();
        GzDecoder::new(bytes)
            .take(limit as u64 + 1)
            .read_to_end(&mut out)?;
        if out.len() > limit {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("inflated body exceeds {} bytes", limit),
            ));
        }
        return Ok(out);
    }
    Ok(bytes.to_vec())
}
