//! The interactive voting loop shared by `vote` and `backlog`.

use crate::core::session::{Decided, Session, SessionState};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::list_batch_votes;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_vote;
use crate::viewer::Viewer;
use std::io::{self, BufRead, Write};

/// One keystroke-line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Choice {
    Yes,
    No,
    Save,
    Quit,
}

impl Choice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Choice::Yes),
            "n" | "no" => Some(Choice::No),
            "s" | "save" => Some(Choice::Save),
            "q" | "quit" | "exit" => Some(Choice::Quit),
            _ => None,
        }
    }
}

/// Block until the user picks an option. End of input counts as quit.
pub(crate) fn read_choice<R: BufRead>(input: &mut R) -> AppResult<Choice> {
    loop {
        print!("[y]es / [n]o / [s]ave / [q]uit > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Choice::Quit);
        }

        match Choice::parse(&line) {
            Some(choice) => return Ok(choice),
            None => warning(format!("Unknown option '{}'", line.trim())),
        }
    }
}

/// Drive `session` until it completes, runs dry or the user quits.
///
/// The cursor is flushed on every way out, including errors.
pub(crate) fn run_session<R: BufRead>(
    pool: &mut DbPool,
    session: &mut Session,
    viewer: &mut dyn Viewer,
    input: &mut R,
) -> AppResult<()> {
    let result = drive(pool, session, viewer, input);

    if let Err(e) = session.flush(pool) {
        warning(format!("Could not save progress: {}", e));
    }

    result
}

fn drive<R: BufRead>(
    pool: &mut DbPool,
    session: &mut Session,
    viewer: &mut dyn Viewer,
    input: &mut R,
) -> AppResult<()> {
    loop {
        let Some(item) = session.current().cloned() else {
            return Ok(());
        };

        if let Err(e) = viewer.show(&item, session.progress()) {
            report_viewer_failure(pool, &item.source_url, &e);
        }

        let value = match read_choice(input)? {
            Choice::Yes => true,
            Choice::No => false,
            Choice::Save => {
                session.flush(pool)?;
                success("Progress saved.");
                continue;
            }
            Choice::Quit => {
                session.cancel(pool)?;
                info("Progress saved. Run the same command again to resume.");
                return Ok(());
            }
        };

        match session.decide(pool, value)? {
            Decided::Next => {}
            Decided::Completed(snapshot) => {
                print_results(pool, &snapshot.batch, session.user())?;
                success(format!(
                    "Batch '{}' complete: {} yes, {} no.",
                    snapshot.batch, snapshot.yes_count, snapshot.no_count
                ));
                return Ok(());
            }
            Decided::Exhausted => {
                if let SessionState::Idle {
                    message: Some(message),
                } = session.state()
                {
                    info(message);
                }
                return Ok(());
            }
        }
    }
}

fn report_viewer_failure(pool: &DbPool, url: &str, e: &AppError) {
    warning(format!("{} (voting continues)", e));
    if let Err(log_err) = ttlog(&pool.conn, "viewer", url, &e.to_string()) {
        warning(format!("Failed to write internal log: {}", log_err));
    }
}

/// "name: Yes|No" for every game of the batch, like the final results dialog.
fn print_results(pool: &DbPool, batch: &str, user: &str) -> AppResult<()> {
    println!("\nVoting results for '{}':", batch);
    for (item, value) in list_batch_votes(&pool.conn, batch, user)? {
        println!("  {}: {}", item.name, colorize_vote(value));
    }
    println!();
    Ok(())
}
