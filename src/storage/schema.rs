//! Database schema definitions
//!
//! This module contains the SQL schema for the Sitemap-Trail result store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One finished crawl per key
CREATE TABLE IF NOT EXISTS crawl_results (
    key TEXT PRIMARY KEY NOT NULL,
    payload TEXT NOT NULL,
    saved_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_crawl_results_saved_at ON crawl_results(saved_at);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
