use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

// ─── Feed cache ──────────────────────────────────────────────────────────────

/// A raw feed body as it was last received for `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedFeed {
    pub date: String,
    pub body: String,
    pub fetched_at: String,
}

pub struct FeedRepo;

impl FeedRepo {
    pub fn store(conn: &Connection, date: &str, body: &str) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO feed_cache (date, body, fetched_at)
             VALUES (?1, ?2, datetime('now'))",
            params![date, body],
        )?;
        Ok(())
    }

    /// Most recent feed by date, whatever day it was for.
    pub fn latest(conn: &Connection) -> Result<Option<CachedFeed>> {
        let row = conn
            .query_row(
                "SELECT date, body, fetched_at FROM feed_cache ORDER BY date DESC LIMIT 1",
                [],
                |row| {
                    Ok(CachedFeed {
                        date: row.get(0)?,
                        body: row.get(1)?,
                        fetched_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn list_dates(conn: &Connection) -> Result<Vec<(String, String)>> {
        let mut stmt =
            conn.prepare("SELECT date, fetched_at FROM feed_cache ORDER BY date DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Drop everything older than `keep_from` (a `YYYY-MM-DD` date).
    pub fn prune_before(conn: &Connection, keep_from: &str) -> Result<usize> {
        let n = conn.execute("DELETE FROM feed_cache WHERE date < ?1", params![keep_from])?;
        Ok(n)
    }

    pub fn clear_all(conn: &Connection) -> Result<usize> {
        let n = conn.execute("DELETE FROM feed_cache", [])?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn store_replaces_same_day() {
        let conn = db();
        FeedRepo::store(&conn, "2026-10-18", r#"{"a":1}"#).unwrap();
        FeedRepo::store(&conn, "2026-10-18", r#"{"a":2}"#).unwrap();
        let cached = FeedRepo::latest(&conn).unwrap().unwrap();
        assert_eq!(cached.date, "2026-10-18");
        assert_eq!(cached.body, r#"{"a":2}"#);
        assert!(!cached.fetched_at.is_empty());
        assert_eq!(FeedRepo::list_dates(&conn).unwrap().len(), 1);
    }

    #[test]
    fn latest_is_by_date() {
        let conn = db();
        assert!(FeedRepo::latest(&conn).unwrap().is_none());
        FeedRepo::store(&conn, "2026-10-17", "b").unwrap();
        FeedRepo::store(&conn, "2026-10-18", "c").unwrap();
        FeedRepo::store(&conn, "2026-10-16", "a").unwrap();
        assert_eq!(FeedRepo::latest(&conn).unwrap().unwrap().date, "2026-10-18");
    }

    #[test]
    fn prune_and_clear() {
        let conn = db();
        for date in ["2026-10-10", "2026-10-17", "2026-10-18"] {
            FeedRepo::store(&conn, date, "{}").unwrap();
        }
        assert_eq!(FeedRepo::prune_before(&conn, "2026-10-17").unwrap(), 1);
        assert_eq!(FeedRepo::clear_all(&conn).unwrap(), 2);
        assert!(FeedRepo::latest(&conn).unwrap().is_none());
    }
}
