use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS feed_cache (
            date        TEXT PRIMARY KEY,
            body        TEXT NOT NULL,
            fetched_at  TEXT DEFAULT (datetime('now'))
        );
    ")?;
    Ok(())
}
