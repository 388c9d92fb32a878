//! Store operations on items, decisions and progress cursors.
//!
//! Every function takes a plain `&Connection`, so callers decide the
//! transaction boundary: pass `&pool.conn` for a single statement, or the
//! `Transaction` handed out by `DbPool::immediate` for multi-step writes.

use crate::errors::AppResult;
use crate::models::{BatchSummary, Decision, Item, NewItem, WritePolicy};
use crate::utils::time::now_rfc3339;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Outcome of inserting a catalog row under its natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(i64),
    /// The `(source_url, batch_name)` pair was already present; row untouched.
    Existing(i64),
}

impl UpsertOutcome {
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Existing(id) => *id,
        }
    }
}

const ITEM_COLUMNS: &str = "id, name, developer, release_date, source_url, batch_name";

pub fn map_item(row: &Row) -> Result<Item> {
    Ok(Item {
        id: row.get("id")?,
        name: row.get("name")?,
        developer: row.get("developer")?,
        release_date: row.get("release_date")?,
        source_url: row.get("source_url")?,
        batch_name: row.get("batch_name")?,
    })
}

pub fn map_decision(row: &Row) -> Result<Decision> {
    Ok(Decision {
        id: row.get("id")?,
        item_id: row.get("item_id")?,
        user_id: row.get("user_id")?,
        value: Decision::value_from_db(row.get("value")?),
        recorded_at: row.get("recorded_at")?,
        exported: row.get::<_, i64>("exported")? != 0,
    })
}

// ---------------------------
// Items
// ---------------------------

pub fn upsert_item(conn: &Connection, item: &NewItem) -> AppResult<UpsertOutcome> {
    let inserted = conn.execute(
        "INSERT INTO items (name, developer, release_date, source_url, batch_name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(source_url, batch_name) DO NOTHING",
        params![
            item.name,
            item.developer,
            item.release_date,
            item.source_url,
            item.batch_name,
            now_rfc3339(),
        ],
    )?;

    if inserted == 1 {
        return Ok(UpsertOutcome::Inserted(conn.last_insert_rowid()));
    }

    let id: i64 = conn.query_row(
        "SELECT id FROM items WHERE source_url = ?1 AND batch_name = ?2",
        params![item.source_url, item.batch_name],
        |row| row.get(0),
    )?;
    Ok(UpsertOutcome::Existing(id))
}

/// All items of a batch in sequential order (ascending id).
pub fn list_items(conn: &Connection, batch: &str) -> AppResult<Vec<Item>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE batch_name = ?1 ORDER BY id ASC"
    ))?;

    let rows = stmt.query_map([batch], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_items(conn: &Connection, batch: &str) -> AppResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM items WHERE batch_name = ?1",
        [batch],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

pub fn find_item(conn: &Connection, id: i64) -> AppResult<Option<Item>> {
    let item = conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
            [id],
            map_item,
        )
        .optional()?;
    Ok(item)
}

/// Random sample of up to `limit` items `user` has not decided yet,
/// skipping the ids in `exclude` (already queued locally).
pub fn list_unvoted(
    conn: &Connection,
    user: &str,
    limit: usize,
    exclude: &[i64],
) -> AppResult<Vec<Item>> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    // Over-fetch by the exclusion size instead of building a dynamic NOT IN.
    let fetch = (limit + exclude.len()) as i64;

    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {ITEM_COLUMNS} FROM items i
         WHERE NOT EXISTS (
             SELECT 1 FROM decisions d WHERE d.item_id = i.id AND d.user_id = ?1
         )
         ORDER BY RANDOM()
         LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![user, fetch], map_item)?;

    let mut out = Vec::new();
    for r in rows {
        let item = r?;
        if !exclude.contains(&item.id) {
            out.push(item);
        }
    }
    out.truncate(limit);
    Ok(out)
}

pub fn count_unvoted(conn: &Connection, user: &str) -> AppResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM items i
         WHERE NOT EXISTS (
             SELECT 1 FROM decisions d WHERE d.item_id = i.id AND d.user_id = ?1
         )",
        [user],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

// ---------------------------
// Decisions
// ---------------------------

/// Write a vote. Returns whether the store changed.
///
/// `Overwrite` replaces value and timestamp of an existing vote but keeps
/// its `exported` marker. `FirstWins` leaves an existing vote alone.
pub fn record_decision(
    conn: &Connection,
    item_id: i64,
    user: &str,
    value: bool,
    policy: WritePolicy,
) -> AppResult<bool> {
    let sql = match policy {
        WritePolicy::Overwrite => {
            "INSERT INTO decisions (item_id, user_id, value, recorded_at, exported)
             VALUES (?1, ?2, ?3, ?4, 0)
             ON CONFLICT(item_id, user_id) DO UPDATE SET
                 value = excluded.value,
                 recorded_at = excluded.recorded_at"
        }
        WritePolicy::FirstWins => {
            "INSERT INTO decisions (item_id, user_id, value, recorded_at, exported)
             VALUES (?1, ?2, ?3, ?4, 0)
             ON CONFLICT(item_id, user_id) DO NOTHING"
        }
    };

    let changed = conn.execute(
        sql,
        params![item_id, user, Decision::value_to_db(value), now_rfc3339()],
    )?;
    Ok(changed > 0)
}

pub fn has_decision(conn: &Connection, item_id: i64, user: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM decisions WHERE item_id = ?1 AND user_id = ?2",
            params![item_id, user],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn find_decision(conn: &Connection, item_id: i64, user: &str) -> AppResult<Option<Decision>> {
    let d = conn
        .query_row(
            "SELECT id, item_id, user_id, value, recorded_at, exported
             FROM decisions WHERE item_id = ?1 AND user_id = ?2",
            params![item_id, user],
            map_decision,
        )
        .optional()?;
    Ok(d)
}

pub fn list_decisions(conn: &Connection, user: &str) -> AppResult<Vec<Decision>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, item_id, user_id, value, recorded_at, exported
         FROM decisions WHERE user_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([user], map_decision)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Decided items of one batch for one user, in batch order.
pub fn list_batch_votes(conn: &Connection, batch: &str, user: &str) -> AppResult<Vec<(Item, bool)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.id, i.name, i.developer, i.release_date, i.source_url, i.batch_name, d.value
         FROM items i
         JOIN decisions d ON d.item_id = i.id
         WHERE i.batch_name = ?1 AND d.user_id = ?2
         ORDER BY i.id ASC",
    )?;

    let rows = stmt.query_map(params![batch, user], |row| {
        Ok((map_item(row)?, Decision::value_from_db(row.get("value")?)))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Flag the given decisions as exported. Rows already flagged (by another
/// process) are not counted; that is not an error.
pub fn mark_exported(conn: &Connection, decision_ids: &[i64]) -> AppResult<usize> {
    let mut stmt =
        conn.prepare_cached("UPDATE decisions SET exported = 1 WHERE id = ?1 AND exported = 0")?;

    let mut affected = 0;
    for id in decision_ids {
        affected += stmt.execute([id])?;
    }
    Ok(affected)
}

// ---------------------------
// Progress cursors
// ---------------------------

/// Current offset of `user` in `batch`; creates the cursor at 0 on first touch.
pub fn get_cursor(conn: &Connection, user: &str, batch: &str) -> AppResult<usize> {
    conn.execute(
        "INSERT INTO progress (user_id, batch_name, current_index, updated_at)
         VALUES (?1, ?2, 0, ?3)
         ON CONFLICT(user_id, batch_name) DO NOTHING",
        params![user, batch, now_rfc3339()],
    )?;

    let idx: i64 = conn.query_row(
        "SELECT current_index FROM progress WHERE user_id = ?1 AND batch_name = ?2",
        params![user, batch],
        |row| row.get(0),
    )?;
    Ok(idx.max(0) as usize)
}

pub fn advance_cursor(conn: &Connection, user: &str, batch: &str, new_index: usize) -> AppResult<()> {
    conn.execute(
        "INSERT INTO progress (user_id, batch_name, current_index, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, batch_name) DO UPDATE SET
             current_index = excluded.current_index,
             updated_at = excluded.updated_at",
        params![user, batch, new_index as i64, now_rfc3339()],
    )?;
    Ok(())
}

/// Per-batch counters for one user, ordered by batch name.
pub fn list_batches(conn: &Connection, user: &str) -> AppResult<Vec<BatchSummary>> {
    let mut stmt = conn.prepare_cached(
        "SELECT i.batch_name,
                COUNT(*) AS items,
                COUNT(d.id) AS decided,
                COALESCE(SUM(d.value), 0) AS yes,
                COALESCE((SELECT p.current_index FROM progress p
                          WHERE p.user_id = ?1 AND p.batch_name = i.batch_name), 0) AS cursor
         FROM items i
         LEFT JOIN decisions d ON d.item_id = i.id AND d.user_id = ?1
         GROUP BY i.batch_name
         ORDER BY i.batch_name ASC",
    )?;

    let rows = stmt.query_map([user], |row| {
        let items: i64 = row.get("items")?;
        let cursor: i64 = row.get("cursor")?;
        Ok(BatchSummary {
            batch_name: row.get("batch_name")?,
            items: items as usize,
            decided: row.get::<_, i64>("decided")? as usize,
            yes: row.get::<_, i64>("yes")? as usize,
            cursor: cursor.clamp(0, items) as usize,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------
// Wipe
// ---------------------------

/// Row counts removed by `wipe_all`: (items, decisions, cursors).
pub fn wipe_all(conn: &Connection) -> AppResult<(usize, usize, usize)> {
    let decisions = conn.execute("DELETE FROM decisions", [])?;
    let cursors = conn.execute("DELETE FROM progress", [])?;
    let items = conn.execute("DELETE FROM items", [])?;
    Ok((items, decisions, cursors))
}

pub fn count_rows(conn: &Connection, table: &str) -> AppResult<i64> {
    let n = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(n)
}
