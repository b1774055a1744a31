//! SQLite persistence for classified indicator records.
//!
//! Records are keyed by timestamp and stored as JSON payloads so that the
//! stored shape always matches what the API serves. A small `meta` table
//! holds the last-update mark.

use crate::error::{AppError, Result};
use crate::services::store::RecordStore;
use crate::types::ClassifiedRecord;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

const LAST_UPDATE_KEY: &str = "last_update";

/// SQLite store for classified records.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("sqlite connection lock poisoned".to_string()))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS indicator_records (
                timestamp INTEGER PRIMARY KEY,
                backtrack INTEGER NOT NULL DEFAULT 0,
                payload TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            )",
            [],
        )?;

        debug!("SQLite schema initialized");
        Ok(())
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM indicator_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn decode(timestamp: i64, payload: &str) -> Option<ClassifiedRecord> {
    match serde_json::from_str(payload) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping unreadable record at {}: {}", timestamp, e);
            None
        }
    }
}

impl RecordStore for SqliteStore {
    fn upsert(&self, records: &[ClassifiedRecord]) -> Result<usize> {
        let mut conn = self.conn()?;
        let now = chrono::Utc::now().timestamp();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO indicator_records (timestamp, backtrack, payload, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(timestamp) DO UPDATE SET
                    backtrack = excluded.backtrack,
                    payload = excluded.payload,
                    updated_at = excluded.updated_at",
            )?;
            for record in records {
                let payload = serde_json::to_string(record)?;
                stmt.execute(params![
                    record.timestamp(),
                    record.record.backtrack,
                    payload,
                    now
                ])?;
            }
        }
        tx.commit()?;

        debug!("Upserted {} records", records.len());
        Ok(records.len())
    }

    fn get_all(&self) -> Result<Vec<ClassifiedRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT timestamp, payload FROM indicator_records ORDER BY timestamp ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

        let mut records = Vec::new();
        for row in rows {
            let (timestamp, payload) = row?;
            if let Some(record) = decode(timestamp, &payload) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn latest_timestamp(&self) -> Result<i64> {
        let conn = self.conn()?;
        let latest: i64 = conn.query_row(
            "SELECT COALESCE(MAX(timestamp), 0) FROM indicator_records",
            [],
            |row| row.get(0),
        )?;
        Ok(latest)
    }

    fn latest_before(&self, timestamp: i64) -> Result<Option<ClassifiedRecord>> {
        let conn = self.conn()?;
        let row: Option<(i64, String)> = conn
            .query_row(
                "SELECT timestamp, payload FROM indicator_records
                 WHERE timestamp < ?1 ORDER BY timestamp DESC LIMIT 1",
                params![timestamp],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row.and_then(|(ts, payload)| decode(ts, &payload)))
    }

    fn set_last_update_mark(&self, timestamp: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![LAST_UPDATE_KEY, timestamp],
        )?;
        Ok(())
    }

    fn last_update_mark(&self) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let mark = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_UPDATE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(mark)
    }
}
