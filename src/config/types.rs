use serde::Deserialize;

/// Main configuration structure for Sitemap-Trail
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause before every fetch (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Follow same-origin HTML links after the sitemap phase
    #[serde(rename = "crawl-html-links", default)]
    pub crawl_html_links: bool,

    /// Maximum link depth for the HTML crawl
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite result store
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Optional path for a markdown summary written after each crawl
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

pub(crate) const DEFAULT_DELAY_MS: u64 = 500;
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 10;

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_crawler_name() -> String {
    "SitemapTrail".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_database_path() -> String {
    "./sitemap-trail.db".to_string()
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            crawl_html_links: false,
            max_depth: default_max_depth(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            summary_path: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `CrawlerName/Version`, followed by `(+ContactURL; ContactEmail)` when
    /// contact details are configured.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);

        match (self.contact_url.as_deref(), self.contact_email.as_deref()) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}
