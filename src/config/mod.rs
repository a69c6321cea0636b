//! Configuration module for Sitemap-Trail
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_trail::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap-trail.toml")).unwrap();
//! println!("HTML crawl max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
pub(crate) use types::DEFAULT_DELAY_MS;

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
