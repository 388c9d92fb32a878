use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::wipe_all;
use crate::errors::AppResult;

/// The two flags an irreversible wipe needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WipeRequest {
    /// The user asked for a wipe (`wipe --all`).
    pub intent: bool,
    /// The user confirmed it (`--yes` or an interactive "yes").
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeOutcome {
    /// At least one flag missing; the store was not touched.
    NotConfirmed,
    Wiped {
        items: usize,
        decisions: usize,
        cursors: usize,
    },
}

pub struct WipeLogic;

impl WipeLogic {
    /// Delete every item, decision and progress cursor, in one transaction.
    pub fn wipe(pool: &mut DbPool, request: WipeRequest) -> AppResult<WipeOutcome> {
        if !(request.intent && request.confirmed) {
            return Ok(WipeOutcome::NotConfirmed);
        }

        pool.immediate(|tx| {
            let (items, decisions, cursors) = wipe_all(tx)?;
            ttlog(
                tx,
                "wipe",
                "all",
                &format!(
                    "Removed {} game(s), {} vote(s), {} cursor(s)",
                    items, decisions, cursors
                ),
            )?;
            Ok(WipeOutcome::Wiped {
                items,
                decisions,
                cursors,
            })
        })
    }
}
