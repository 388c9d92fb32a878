use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::schema_version;
use crate::db::log::count_operations;
use crate::db::migrate::run_pending_migrations;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        let db_path = expand_tilde(&cfg.database).to_string_lossy().to_string();
        let before = recorded_migrations(&db_path);

        // Opening already applies pending migrations.
        let mut pool = open_store(cfg)?;

        if *migrate {
            run_pending_migrations(&pool.conn)?;
            let applied = count_operations(&pool.conn, "migration_applied", None)?;
            match before {
                Some(n) if n == applied => info(format!(
                    "Schema v{} is current, nothing to migrate.",
                    schema_version(&pool.conn)?
                )),
                _ => success(format!(
                    "Schema v{} ready ({} migration step(s) recorded).",
                    schema_version(&pool.conn)?,
                    applied
                )),
            }
        }

        if *show_info {
            stats::print_db_info(&mut pool, &db_path)?;
        }

        if *check {
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            let orphans: i64 = pool.conn.query_row(
                "SELECT COUNT(*) FROM progress p
                 WHERE NOT EXISTS (SELECT 1 FROM items i WHERE i.batch_name = p.batch_name)",
                [],
                |row| row.get(0),
            )?;

            if integrity == "ok" {
                success("Integrity check passed.");
            } else {
                warning(format!("Integrity check failed: {}", integrity));
            }
            if orphans > 0 {
                warning(format!(
                    "{} progress cursor(s) point at batches with no games.",
                    orphans
                ));
            }
        }

        if *vacuum {
            let size_before = fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
            pool.conn.execute_batch("VACUUM;")?;
            let size_after = fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
            success(format!(
                "Vacuum completed: {} → {} bytes.",
                size_before, size_after
            ));
        }
    }

    Ok(())
}

/// Migration steps already recorded, read without migrating. `None` when the
/// store cannot be read yet (missing file, no log table).
fn recorded_migrations(db_path: &str) -> Option<i64> {
    let conn = rusqlite::Connection::open_with_flags(
        db_path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    )
    .ok()?;
    count_operations(&conn, "migration_applied", None).ok()
}
