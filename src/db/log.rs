use crate::errors::AppResult;
use chrono::Local;
use rusqlite::Connection;
use rusqlite::params;

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Count log rows for one operation (and optionally one target).
pub fn count_operations(conn: &Connection, operation: &str, target: Option<&str>) -> AppResult<i64> {
    let n = match target {
        Some(t) => conn.query_row(
            "SELECT COUNT(*) FROM log WHERE operation = ?1 AND target = ?2",
            params![operation, t],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM log WHERE operation = ?1",
            [operation],
            |row| row.get(0),
        )?,
    };
    Ok(n)
}
