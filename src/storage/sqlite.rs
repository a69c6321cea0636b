//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ResultStore
//! trait. The connection is opened on first use and dropped after any SQLite
//! error, so the next call starts from a fresh connection.

use crate::state::CrawlResult;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ResultStore, StorageError, StorageResult};
use crate::storage::{StoredCrawl, StoredKey};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// SQLite result store backend
pub struct SqliteResultStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteResultStore {
    /// Creates a store for the database at `path` without connecting
    ///
    /// The file is created on the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Creates a store and connects immediately
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteResultStore)` - Database opened and schema ready
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let mut store = Self::new(path);
        store.connection()?;
        Ok(store)
    }

    /// Returns true while a connection is held
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns the live connection, opening one if needed
    fn connection(&mut self) -> StorageResult<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::debug!("Opening result store at {}", self.path.display());
                open_connection(&self.path)?
            }
        };
        let conn: &Connection = self.conn.insert(conn);
        Ok(conn)
    }

    /// Runs `op` against the connection, dropping it after a SQLite error
    fn with_conn<T>(
        &mut self,
        op: impl FnOnce(&Connection) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let result = {
            let conn = self.connection()?;
            op(conn)
        };

        if let Err(StorageError::Sqlite(e)) = &result {
            tracing::warn!(
                "Result store error on {}, reconnecting on next use: {}",
                self.path.display(),
                e
            );
            self.conn = None;
        }

        result
    }
}

fn open_connection(path: &Path) -> StorageResult<Connection> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}

fn parse_saved_at(key: &str, raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRecord {
            key: key.to_string(),
            reason: format!("invalid timestamp '{}': {}", raw, e),
        })
}

impl ResultStore for SqliteResultStore {
    fn save(&mut self, key: &str, result: &CrawlResult) -> StorageResult<()> {
        let payload = serde_json::to_string(result)?;
        let now = Utc::now().to_rfc3339();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO crawl_results (key, payload, saved_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, saved_at = excluded.saved_at",
                params![key, payload, now],
            )?;
            Ok(())
        })
    }

    fn load(&mut self, key: &str) -> StorageResult<Option<StoredCrawl>> {
        let row = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT payload, saved_at FROM crawl_results WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;
            Ok(row)
        })?;

        let Some((payload, saved_at)) = row else {
            return Ok(None);
        };

        let result: CrawlResult =
            serde_json::from_str(&payload).map_err(|e| StorageError::CorruptRecord {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(StoredCrawl {
            key: key.to_string(),
            saved_at: parse_saved_at(key, &saved_at)?,
            result,
        }))
    }

    fn exists(&mut self, key: &str) -> StorageResult<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM crawl_results WHERE key = ?1",
                    params![key],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    fn size_of(&mut self, key: &str) -> StorageResult<Option<u64>> {
        self.with_conn(|conn| {
            let size = conn
                .query_row(
                    "SELECT LENGTH(CAST(payload AS BLOB)) FROM crawl_results WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            Ok(size.map(|s| s as u64))
        })
    }

    fn list(&mut self) -> StorageResult<Vec<StoredKey>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT key, LENGTH(CAST(payload AS BLOB)), saved_at FROM crawl_results ORDER BY key",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })?;

        rows.into_iter()
            .map(|(key, size, saved_at)| {
                let saved_at = parse_saved_at(&key, &saved_at)?;
                Ok(StoredKey {
                    key,
                    size_bytes: size as u64,
                    saved_at,
                })
            })
            .collect()
    }

    fn delete(&mut self, key: &str) -> StorageResult<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM crawl_results WHERE key = ?1", params![key])?;
            Ok(removed > 0)
        })
    }

    fn delete_all(&mut self) -> StorageResult<u64> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM crawl_results", [])?;
            Ok(removed as u64)
        })
    }
}
