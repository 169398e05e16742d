use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::OasisError;

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

/// SQLite-backed local storage: the watchlist and small preferences.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, OasisError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, OasisError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Watchlist ───────────────────────────────────────────────

    /// All watchlisted catalog IDs, oldest first.
    pub fn watchlist_ids(&self) -> Result<Vec<u64>, OasisError> {
        let mut stmt = self
            .conn
            .prepare("SELECT anime_id FROM watchlist ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .filter_map(|r| r.ok())
            .map(|id| id as u64)
            .collect();
        Ok(rows)
    }

    /// Add an ID. Returns `false` if it was already present.
    pub fn watchlist_add(&self, anime_id: u64) -> Result<bool, OasisError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO watchlist (anime_id, added_at) VALUES (?1, ?2)",
            params![anime_id as i64, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    /// Remove an ID. Returns `false` if it was not present.
    pub fn watchlist_remove(&self, anime_id: u64) -> Result<bool, OasisError> {
        let deleted = self.conn.execute(
            "DELETE FROM watchlist WHERE anime_id = ?1",
            params![anime_id as i64],
        )?;
        Ok(deleted > 0)
    }

    pub fn watchlist_clear(&self) -> Result<(), OasisError> {
        self.conn.execute("DELETE FROM watchlist", [])?;
        Ok(())
    }

    // ── Preferences ─────────────────────────────────────────────

    pub fn get_pref(&self, key: &str) -> Result<Option<String>, OasisError> {
        self.conn
            .query_row(
                "SELECT value FROM preference WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn set_pref(&self, key: &str, value: &str) -> Result<(), OasisError> {
        self.conn.execute(
            "INSERT INTO preference (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete_pref(&self, key: &str) -> Result<(), OasisError> {
        self.conn
            .execute("DELETE FROM preference WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), OasisError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}
