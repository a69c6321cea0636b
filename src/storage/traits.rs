//! Storage traits and error types
//!
//! This module defines the trait interface for result store backends and
//! associated error types.

use crate::state::CrawlResult;
use crate::storage::{StoredCrawl, StoredKey};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record '{key}': {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value store for finished crawl results
///
/// Results are opaque JSON blobs keyed by the entry sitemap's filename.
/// Methods take `&mut self` because implementations may open or reopen
/// their backing connection on demand.
pub trait ResultStore {
    /// Saves a result under `key`, replacing any previous one
    fn save(&mut self, key: &str, result: &CrawlResult) -> StorageResult<()>;

    /// Loads the result stored under `key`
    fn load(&mut self, key: &str) -> StorageResult<Option<StoredCrawl>>;

    /// Returns true if a result is stored under `key`
    fn exists(&mut self, key: &str) -> StorageResult<bool>;

    /// Size of the stored payload in bytes
    fn size_of(&mut self, key: &str) -> StorageResult<Option<u64>>;

    /// Lists every stored key, ordered by key
    fn list(&mut self) -> StorageResult<Vec<StoredKey>>;

    /// Deletes one result; returns false if nothing was stored
    fn delete(&mut self, key: &str) -> StorageResult<bool>;

    /// Deletes every result; returns how many were removed
    fn delete_all(&mut self) -> StorageResult<u64>;
}
