use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Schema:{} v{}",
        CYAN,
        RESET,
        crate::db::initialize::schema_version(&pool.conn)?
    );

    //
    // 2) CATALOG
    //
    let (items, batches): (i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT batch_name) FROM items",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!(
        "{}• Games:{} {}{}{} in {} batch(es)",
        CYAN, RESET, GREEN, items, RESET, batches
    );

    //
    // 3) VOTES
    //
    let (votes, voters, pending): (i64, i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*),
                COUNT(DISTINCT user_id),
                COALESCE(SUM(CASE WHEN value = 1 AND exported = 0 THEN 1 ELSE 0 END), 0)
         FROM decisions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    println!(
        "{}• Votes:{} {}{}{} by {} voter(s)",
        CYAN, RESET, GREEN, votes, RESET, voters
    );
    println!("{}• Yes votes not yet exported:{} {}", CYAN, RESET, pending);

    //
    // 4) LAST ACTIVITY
    //
    let last_vote: Option<String> = pool
        .conn
        .query_row(
            "SELECT recorded_at FROM decisions ORDER BY recorded_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_last = last_vote
        .map(|t| crate::utils::time::display_timestamp(&t))
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Last vote:{} {}", CYAN, RESET, fmt_last);

    println!();
    Ok(())
}
