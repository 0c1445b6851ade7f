use crate::errors::StoreError;
use crate::lot_processor::LotStatus;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS open_spaces (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        checked_at  TIMESTAMP NOT NULL,
        lot         TEXT NOT NULL,
        spaces      INTEGER NOT NULL CHECK (spaces >= 0)
    );
    CREATE INDEX IF NOT EXISTS ix_open_spaces_checked_at ON open_spaces (checked_at);
    CREATE INDEX IF NOT EXISTS ix_open_spaces_lot ON open_spaces (lot);
";

/// One persisted reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub id: i64,
    pub checked_at: DateTime<Utc>,
    pub lot: String,
    pub spaces: u32,
}

impl Observation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            checked_at: row.get(1)?,
            lot: row.get(2)?,
            spaces: row.get(3)?,
        })
    }
}

/// Append-only store of observations in a single SQLite file.
pub struct LotStore {
    conn: Connection,
}

impl LotStore {
    /// Open (or create) the database at `path` and make sure the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert one row per lot, all stamped with `checked_at`, in a single transaction.
    pub fn record(
        &mut self,
        checked_at: DateTime<Utc>,
        status: &LotStatus,
    ) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO open_spaces (checked_at, lot, spaces) VALUES (?1, ?2, ?3)",
            )?;
            for (lot, spaces) in status {
                stmt.execute(params![checked_at, lot, spaces])?;
            }
        }
        tx.commit()?;

        debug!("Committed {} observations at {}", status.len(), checked_at);
        Ok(status.len())
    }

    /// Every observation, oldest first.
    pub fn observations(&self) -> Result<Vec<Observation>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, checked_at, lot, spaces FROM open_spaces ORDER BY id")?;
        let rows = stmt.query_map([], Observation::from_row)?;
        let observations = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(observations)
    }

    /// Observations from the most recent cycle, if any was recorded.
    pub fn latest(&self) -> Result<Vec<Observation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, checked_at, lot, spaces FROM open_spaces
             WHERE checked_at = (SELECT checked_at FROM open_spaces ORDER BY id DESC LIMIT 1)
             ORDER BY id",
        )?;
        let rows = stmt.query_map([], Observation::from_row)?;
        let observations = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(observations)
    }
}
