//! Sitemap-Trail: a sitemap-driven URL discovery crawler
//!
//! This crate resolves a website's sitemap hierarchy (and optionally its
//! same-origin HTML link graph), recording for every discovered URL the trail
//! of sitemaps or link hops that led to it.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Trail operations
#[derive(Debug, Error)]
pub enum TrailError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Response body for {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    #[error("Unexpected content type '{content_type}' for {url}")]
    ContentType { url: String, content_type: String },

    #[error("XML parse error for {url}: {source}")]
    XmlParse { url: String, source: XmlError },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// XML document errors
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("document has no root element")]
    Empty,

    #[error("unclosed element <{0}>")]
    Unclosed(String),
}

/// Result type alias for Sitemap-Trail operations
pub type Result<T> = std::result::Result<T, TrailError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlRequest};
pub use state::{CrawlResult, Source, UrlEntry};
pub use crate::url::{normalize_url, sitemap_filename};
