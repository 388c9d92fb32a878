//! SQLite connection wrapper (lightweight for CLI usage).

use crate::db::initialize::init_db;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, Result, Transaction, TransactionBehavior};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another process holding the store lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open the file and apply connection settings. No migrations.
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        configure(&conn, true)?;
        Ok(Self { conn })
    }

    /// Open the store at `path`, creating parent directories and running
    /// pending migrations. Any failure here aborts the session start.
    pub fn open(path: &str) -> AppResult<Self> {
        let store_err = |reason: String| AppError::StoreOpen {
            path: path.to_string(),
            reason,
        };

        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| store_err(e.to_string()))?;
        }

        let pool = Self::new(path).map_err(|e| store_err(e.to_string()))?;
        init_db(&pool.conn).map_err(|e| store_err(e.to_string()))?;
        Ok(pool)
    }

    /// Fresh in-memory store with the current schema.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn, false)?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// Run `func` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so two processes voting on the same
    /// store serialize instead of failing on lock upgrade. Returning an error
    /// from `func` drops the transaction, which rolls it back.
    pub fn immediate<F, T>(&mut self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> AppResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = func(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

fn configure(conn: &Connection, file_backed: bool) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    if file_backed {
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    }
    Ok(())
}
