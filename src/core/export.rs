use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{count_items, list_batch_votes, map_item, mark_exported};
use crate::errors::{AppError, AppResult};
use crate::export::model::{GAME_HEADERS, NEW_VOTE_HEADERS};
use crate::export::{
    ExportTarget, GameExport, NewVoteExport, new_votes_path, snapshot_paths, write_rows,
};
use crate::ui::messages::warning;
use rusqlite::{Connection, params};
use std::path::PathBuf;

/// Result of a per-batch snapshot export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSnapshot {
    pub batch: String,
    pub yes_count: usize,
    pub no_count: usize,
    pub yes_path: PathBuf,
    pub no_path: PathBuf,
}

/// Result of an exactly-once export of new yes votes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVotesExport {
    pub written: usize,
    /// Rows flagged by this call.
    pub marked: usize,
    pub path: Option<PathBuf>,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export every yes vote of `user` not exported yet, oldest vote first,
    /// then flag exactly those rows as exported.
    ///
    /// Select, write and mark share one immediate transaction: a second
    /// exporter on the same store waits for the commit and selects nothing.
    pub fn export_new_positive(
        pool: &mut DbPool,
        user: &str,
        target: &ExportTarget,
    ) -> AppResult<NewVotesExport> {
        let result = pool.immediate(|tx| {
            let selected = load_new_positive(tx, user)?;
            if selected.is_empty() {
                return Ok(NewVotesExport {
                    written: 0,
                    marked: 0,
                    path: None,
                });
            }

            let path = new_votes_path(target);
            let rows: Vec<NewVoteExport> = selected.iter().map(|(_, row)| row.clone()).collect();
            write_rows(target.format, &rows, &NEW_VOTE_HEADERS, &path)?;

            let ids: Vec<i64> = selected.iter().map(|(id, _)| *id).collect();
            let marked = mark_exported(tx, &ids)?;
            ttlog(
                tx,
                "export",
                user,
                &format!("{} new yes vote(s) → {}", rows.len(), path.display()),
            )?;

            Ok(NewVotesExport {
                written: rows.len(),
                marked,
                path: Some(path),
            })
        })?;

        if result.written == 0 {
            warning("No new yes votes to export.");
        }
        Ok(result)
    }

    /// Write `<batch>_yes_votes` and `<batch>_no_votes` with every item of
    /// `batch` that `user` decided, ignoring the exported flag.
    pub fn export_batch_snapshot(
        pool: &mut DbPool,
        batch: &str,
        user: &str,
        target: &ExportTarget,
    ) -> AppResult<BatchSnapshot> {
        if count_items(&pool.conn, batch)? == 0 {
            return Err(AppError::EmptyBatch(batch.to_string()));
        }

        let votes = list_batch_votes(&pool.conn, batch, user)?;

        let (yes, no): (Vec<_>, Vec<_>) = votes.iter().partition(|(_, v)| *v);
        let yes_rows: Vec<GameExport> = yes.iter().map(|(item, _)| item.into()).collect();
        let no_rows: Vec<GameExport> = no.iter().map(|(item, _)| item.into()).collect();

        let (yes_path, no_path) = snapshot_paths(target, batch);
        write_rows(target.format, &yes_rows, &GAME_HEADERS, &yes_path)?;
        write_rows(target.format, &no_rows, &GAME_HEADERS, &no_path)?;

        ttlog(
            &pool.conn,
            "export_snapshot",
            batch,
            &format!(
                "{}{} {} yes / {} no → {}",
                user,
                SNAPSHOT_USER_SEP,
                yes_rows.len(),
                no_rows.len(),
                target.dir.display()
            ),
        )?;

        Ok(BatchSnapshot {
            batch: batch.to_string(),
            yes_count: yes_rows.len(),
            no_count: no_rows.len(),
            yes_path,
            no_path,
        })
    }

    /// Whether a snapshot of `batch` was ever written for `user`.
    pub fn has_snapshot(conn: &Connection, batch: &str, user: &str) -> AppResult<bool> {
        let prefix = format!("{user}{SNAPSHOT_USER_SEP}");
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM log
             WHERE operation = 'export_snapshot' AND target = ?1
               AND substr(message, 1, length(?2)) = ?2",
            params![batch, prefix],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }
}

/// Separates the voter from the counts in `export_snapshot` log messages.
const SNAPSHOT_USER_SEP: &str = ":";

/// Unexported yes votes of `user` with their item fields, ordered by vote time.
fn load_new_positive(conn: &Connection, user: &str) -> AppResult<Vec<(i64, NewVoteExport)>> {
    let mut stmt = conn.prepare(
        "SELECT d.id AS decision_id, d.recorded_at,
                i.id, i.name, i.developer, i.release_date, i.source_url, i.batch_name
         FROM decisions d
         JOIN items i ON i.id = d.item_id
         WHERE d.user_id = ?1 AND d.value = 1 AND d.exported = 0
         ORDER BY d.recorded_at ASC, d.id ASC",
    )?;

    let rows = stmt.query_map([user], |row| {
        let item = map_item(row)?;
        let recorded_at: String = row.get("recorded_at")?;
        Ok((
            row.get::<_, i64>("decision_id")?,
            NewVoteExport::new(&item, &recorded_at),
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
