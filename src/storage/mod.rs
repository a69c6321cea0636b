//! Storage module for persisting crawl results
//!
//! This module handles saving finished crawls, including:
//! - SQLite database initialization and schema management
//! - Saving and loading results as JSON blobs keyed by sitemap filename
//! - Key enumeration, size reporting and deletion

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteResultStore;
pub use traits::{ResultStore, StorageError, StorageResult};

use crate::state::CrawlResult;
use crate::TrailError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Opens the result store database, creating it if needed
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteResultStore)` - Successfully opened store
/// * `Err(TrailError)` - Failed to open the database
pub fn open_store(path: &Path) -> Result<SqliteResultStore, TrailError> {
    Ok(SqliteResultStore::open(path)?)
}

/// A saved crawl and when it was saved
#[derive(Debug, Clone)]
pub struct StoredCrawl {
    pub key: String,
    pub saved_at: DateTime<Utc>,
    pub result: CrawlResult,
}

/// Summary of one stored key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKey {
    pub key: String,
    pub size_bytes: u64,
    pub saved_at: DateTime<Utc>,
}
