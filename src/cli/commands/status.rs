use crate::cli::commands::open_store;
use crate::config::Config;
use crate::db::queries::{count_unvoted, list_batches};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_progress};
use crate::utils::table::{Column, Table};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_store(cfg)?;
    let batches = list_batches(&pool.conn, &cfg.user)?;

    if batches.is_empty() {
        info("No games imported yet. Start with `steamvoter import <file.csv>`.");
        return Ok(());
    }

    header(format!("Progress for {}", cfg.user));

    let mut table = Table::new(vec![
        Column::new("Batch", 32),
        Column::new("Games", 6),
        Column::new("Voted", 6),
        Column::new("Yes", 6),
        Column::new("Position", 10),
        Column::new("State", 12),
    ]);

    for b in &batches {
        let state = if b.is_complete() {
            "complete"
        } else if b.cursor == 0 && b.decided == 0 {
            "not started"
        } else {
            "in progress"
        };

        table.add_row(vec![
            b.batch_name.clone(),
            b.items.to_string(),
            b.decided.to_string(),
            b.yes.to_string(),
            format!("{}/{}", b.cursor, b.items),
            state.to_string(),
        ]);
    }

    print!("{}", table.render());

    let done = batches.iter().filter(|b| b.is_complete()).count();
    println!(
        "\n{}{}/{} batch(es) complete{}, {} game(s) left for backlog mode.",
        color_for_progress(done, batches.len()),
        done,
        batches.len(),
        RESET,
        count_unvoted(&pool.conn, &cfg.user)?
    );

    Ok(())
}
