use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::wipe::{WipeLogic, WipeOutcome, WipeRequest};
use crate::errors::AppResult;
use crate::ui::messages::{ask_confirmation, info, success, warning};
use std::io;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Wipe { all, yes } = cmd {
        // Only ask when the intent is there; `--yes` skips the prompt.
        let confirmed = *all
            && (*yes
                || ask_confirmation(
                    &mut io::stdin().lock(),
                    &format!(
                        "Delete ALL games, votes and progress in {}? This action is irreversible.",
                        cfg.database
                    ),
                ));

        let mut pool = open_store(cfg)?;
        let request = WipeRequest {
            intent: *all,
            confirmed,
        };

        match WipeLogic::wipe(&mut pool, request)? {
            WipeOutcome::NotConfirmed if !*all => {
                warning("Nothing wiped: pass --all to delete every game, vote and progress cursor.")
            }
            WipeOutcome::NotConfirmed => info("Operation cancelled. The store is unchanged."),
            WipeOutcome::Wiped {
                items,
                decisions,
                cursors,
            } => success(format!(
                "Store wiped: {} game(s), {} vote(s), {} progress cursor(s) removed.",
                items, decisions, cursors
            )),
        }
    }

    Ok(())
}
