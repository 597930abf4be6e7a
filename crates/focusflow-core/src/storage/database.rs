//! SQLite-backed session store.
//!
//! One append-only table of committed session records, indexed by date.
//! The connection sits behind a mutex so the store can be shared across
//! the tracking loop and host threads as a trait object.

use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::{data_dir, SessionStore};
use crate::error::StoreError;
use crate::session::SessionRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database for session records.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/focusflow/focusflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("focusflow.db");
        let conn = Connection::open(&path)
            .map_err(|source| StoreError::OpenFailed { path, source })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (tests, ephemeral hosts).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .lock()
            .unwrap()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    duration_secs INTEGER NOT NULL,
                    date          TEXT NOT NULL,
                    distractions  INTEGER NOT NULL DEFAULT 0
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);",
            )
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))
    }
}

impl SessionStore for Database {
    fn append(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.conn.lock().unwrap().execute(
            "INSERT INTO sessions (duration_secs, date, distractions) VALUES (?1, ?2, ?3)",
            params![
                record.duration_secs,
                record.date.format(DATE_FORMAT).to_string(),
                record.distractions,
            ],
        )?;
        Ok(())
    }

    fn query_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT duration_secs, date, distractions
             FROM sessions
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (duration_secs, date, distractions) = row?;
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| StoreError::QueryFailed(format!("bad date '{date}': {e}")))?;
            records.push(SessionRecord {
                duration_secs,
                date,
                distractions,
            });
        }
        Ok(records)
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        self.conn
            .lock()
            .unwrap()
            .execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}
