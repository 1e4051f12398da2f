//! rollcall-store — SQLite-backed attendance ledger.
//!
//! One row per (date, name) pair with a UNIQUE constraint, so marking
//! someone present is a single atomic `INSERT OR IGNORE`: idempotent for
//! repeats and safe under concurrent marks for the same date. The ledger
//! is the only component that writes attendance; readers get snapshots
//! assembled into [`AttendanceRecord`]s.

use std::collections::BTreeSet;
use std::path::Path;

use rollcall_core::AttendanceRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// The persistence layer is unreachable or a statement failed.
    /// Not retried here; retry policy belongs to the caller.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<tokio_rusqlite::Error> for LedgerError {
    fn from(e: tokio_rusqlite::Error) -> Self {
        LedgerError::Unavailable(e.to_string())
    }
}

/// Handle to the attendance ledger. Cheap to clone; all clones share one
/// connection serviced on a dedicated thread by `tokio-rusqlite`.
#[derive(Clone)]
pub struct Ledger {
    conn: tokio_rusqlite::Connection,
}

impl Ledger {
    /// Open (or create) the ledger database at `path`.
    pub async fn open(path: &Path) -> Result<Self, LedgerError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| LedgerError::Unavailable(format!("{}: {e}", dir.display())))?;
        }
        let conn = tokio_rusqlite::Connection::open(path.to_path_buf()).await?;
        let ledger = Self { conn };
        ledger.init_schema().await?;
        tracing::info!(path = %path.display(), "attendance ledger opened");
        Ok(ledger)
    }

    /// In-memory ledger for tests.
    pub async fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = tokio_rusqlite::Connection::open_in_memory().await?;
        let ledger = Self { conn };
        ledger.init_schema().await?;
        Ok(ledger)
    }

    async fn init_schema(&self) -> Result<(), LedgerError> {
        self.conn
            .call(|conn| {
                // WAL for crash recovery; the in-memory test DB ignores it.
                let _ = conn.pragma_update(None, "journal_mode", "WAL");

                conn.execute(
                    "CREATE TABLE IF NOT EXISTS attendance (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        date TEXT NOT NULL,
                        name TEXT NOT NULL,
                        marked_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                        UNIQUE(date, name)
                    )",
                    [],
                )?;
                conn.execute(
                    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date)",
                    [],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Idempotently mark `name` present on `date`.
    ///
    /// The UNIQUE(date, name) constraint makes this a set-insert: a repeat
    /// mark changes nothing, and concurrent marks with different names for
    /// the same date both land.
    pub async fn mark_present(&self, date: &str, name: &str) -> Result<(), LedgerError> {
        let date = date.to_string();
        let name = name.to_string();
        let inserted = {
            let date = date.clone();
            let name = name.clone();
            self.conn
                .call(move |conn| {
                    let n = conn.execute(
                        "INSERT OR IGNORE INTO attendance (date, name) VALUES (?1, ?2)",
                        rusqlite::params![date, name],
                    )?;
                    Ok(n)
                })
                .await?
        };
        if inserted > 0 {
            tracing::debug!(date = %date, name = %name, "attendance row inserted");
        }
        Ok(())
    }

    /// The record for `date`, or `None` if nobody was marked that day.
    pub async fn records_for_date(&self, date: &str) -> Result<Option<AttendanceRecord>, LedgerError> {
        let date = date.to_string();
        let record = self
            .conn
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT name FROM attendance WHERE date = ?1 ORDER BY name ASC")?;
                let users = stmt
                    .query_map([&date], |row| row.get::<_, String>(0))?
                    .collect::<Result<BTreeSet<_>, _>>()?;
                if users.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(AttendanceRecord { date, users }))
                }
            })
            .await?;
        Ok(record)
    }

    /// Every stored record, ascending by date.
    pub async fn all_records(&self) -> Result<Vec<AttendanceRecord>, LedgerError> {
        let records = self
            .conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare("SELECT date, name FROM attendance ORDER BY date ASC, name ASC")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut records: Vec<AttendanceRecord> = Vec::new();
                for row in rows {
                    let (date, name) = row?;
                    match records.last_mut() {
                        Some(rec) if rec.date == date => {
                            rec.users.insert(name);
                        }
                        _ => {
                            let mut rec = AttendanceRecord::new(date);
                            rec.users.insert(name);
                            records.push(rec);
                        }
                    }
                }
                Ok(records)
            })
            .await?;
        Ok(records)
    }
}
