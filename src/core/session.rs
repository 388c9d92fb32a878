//! Voting session state machine.
//!
//! A `Session` is a plain value: the store is handed to every transition by
//! reference, and the state enum holds everything needed to resume. Each
//! browsing mode is its own variant with its own decide/advance logic.
//!
//! ```text
//! Idle ──load_batch──▶ Sequential ──last vote──▶ Complete
//!  │ ▲                     │
//!  │ └──────cancel─────────┘
//!  └──start_backlog──▶ Backlog ──queue drained──▶ Idle (with message)
//! ```

use crate::core::export::{BatchSnapshot, ExportLogic};
use crate::db::pool::DbPool;
use crate::db::queries::{
    advance_cursor, get_cursor, has_decision, list_items, list_unvoted, record_decision,
};
use crate::errors::{AppError, AppResult};
use crate::export::ExportTarget;
use crate::models::{Item, Progress, WritePolicy};
use rusqlite::Connection;
use std::collections::VecDeque;

/// Candidates fetched per backlog round trip.
pub const PREFETCH_SIZE: usize = 10;
/// Refill the backlog queue when it holds fewer candidates than this.
pub const LOW_WATER_MARK: usize = 3;

pub const NO_UNVOTED_MESSAGE: &str = "No unvoted games remain.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialState {
    pub batch: String,
    items: Vec<Item>,
    cursor: usize,
}

impl SequentialState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn current(&self) -> Option<&Item> {
        self.items.get(self.cursor)
    }

    fn is_complete(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Overwrite-vote on the current item and move the cursor by one, both
    /// in one immediate transaction. Returns true when the batch is done.
    fn decide(&mut self, pool: &mut DbPool, user: &str, value: bool) -> AppResult<bool> {
        let item_id = self.current().ok_or(AppError::NoActiveItem)?.id;
        let next = self.cursor + 1;

        pool.immediate(|tx| {
            record_decision(tx, item_id, user, value, WritePolicy::Overwrite)?;
            advance_cursor(tx, user, &self.batch, next)
        })?;

        self.cursor = next;
        Ok(self.is_complete())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogState {
    queue: VecDeque<Item>,
    current: Item,
}

impl BacklogState {
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// First-wins vote on the current item, then move to the next valid
    /// candidate. A vote dropped because one already exists is not an error.
    fn decide(&mut self, pool: &mut DbPool, user: &str, value: bool) -> AppResult<bool> {
        let item_id = self.current.id;
        pool.immediate(|tx| record_decision(tx, item_id, user, value, WritePolicy::FirstWins))?;

        match next_candidate(&pool.conn, user, &mut self.queue)? {
            Some(item) => {
                self.current = item;
                Ok(false)
            }
            None => Ok(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No batch loaded. `message` explains why a mode ended, if it did.
    Idle { message: Option<String> },
    Sequential(SequentialState),
    Backlog(BacklogState),
    /// Every item of `batch` is decided for this user.
    Complete { batch: String },
}

/// What a `decide` call led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decided {
    /// Another item is waiting.
    Next,
    /// The last item of the batch was decided and the snapshot written.
    Completed(BatchSnapshot),
    /// Backlog mode ran out of undecided items; the session is Idle again.
    Exhausted,
}

pub struct Session {
    user: String,
    export: ExportTarget,
    state: SessionState,
}

impl Session {
    pub fn new(user: &str, export: ExportTarget) -> Self {
        Self {
            user: user.to_string(),
            export,
            state: SessionState::Idle { message: None },
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Complete { .. })
    }

    /// The item waiting for a vote, if any.
    pub fn current(&self) -> Option<&Item> {
        match &self.state {
            SessionState::Sequential(seq) => seq.current(),
            SessionState::Backlog(backlog) => Some(&backlog.current),
            SessionState::Idle { .. } | SessionState::Complete { .. } => None,
        }
    }

    /// 1-based position in the batch; only sequential browsing has one.
    pub fn progress(&self) -> Option<Progress> {
        match &self.state {
            SessionState::Sequential(seq) if !seq.is_complete() => Some(Progress {
                position: seq.cursor + 1,
                total: seq.items.len(),
            }),
            _ => None,
        }
    }

    fn ensure_idle(&self, action: &str) -> AppResult<()> {
        match self.state {
            SessionState::Idle { .. } | SessionState::Complete { .. } => Ok(()),
            _ => Err(AppError::Session(format!(
                "cannot {action} while another batch is being browsed"
            ))),
        }
    }

    /// Idle → Sequential, or straight to Complete when the cursor already
    /// sits at the end of the batch. The snapshot is only written then if
    /// this user never got one (an earlier export failed).
    pub fn load_batch(&mut self, pool: &mut DbPool, batch: &str) -> AppResult<&SessionState> {
        self.ensure_idle("load a batch")?;

        let items = list_items(&pool.conn, batch)?;
        if items.is_empty() {
            return Err(AppError::EmptyBatch(batch.to_string()));
        }

        let stored = get_cursor(&pool.conn, &self.user, batch)?;
        let cursor = stored.min(items.len());

        self.state = if cursor == items.len() {
            if !ExportLogic::has_snapshot(&pool.conn, batch, &self.user)? {
                ExportLogic::export_batch_snapshot(pool, batch, &self.user, &self.export)?;
            }
            SessionState::Complete {
                batch: batch.to_string(),
            }
        } else {
            SessionState::Sequential(SequentialState {
                batch: batch.to_string(),
                items,
                cursor,
            })
        };

        Ok(&self.state)
    }

    /// Idle → Backlog, or Idle with a message when nothing is left to vote on.
    pub fn start_backlog(&mut self, pool: &mut DbPool) -> AppResult<&SessionState> {
        self.ensure_idle("start the backlog")?;

        let mut queue = VecDeque::with_capacity(PREFETCH_SIZE);
        self.state = match next_candidate(&pool.conn, &self.user, &mut queue)? {
            Some(current) => SessionState::Backlog(BacklogState { queue, current }),
            None => SessionState::Idle {
                message: Some(NO_UNVOTED_MESSAGE.to_string()),
            },
        };

        Ok(&self.state)
    }

    /// Record a vote on the current item and advance.
    pub fn decide(&mut self, pool: &mut DbPool, value: bool) -> AppResult<Decided> {
        match &mut self.state {
            SessionState::Sequential(seq) => {
                if !seq.decide(pool, &self.user, value)? {
                    return Ok(Decided::Next);
                }

                // On export failure the session stays Sequential at the end
                // of the batch; loading it again retries the snapshot.
                let batch = seq.batch.clone();
                let snapshot =
                    ExportLogic::export_batch_snapshot(pool, &batch, &self.user, &self.export)?;
                self.state = SessionState::Complete { batch };
                Ok(Decided::Completed(snapshot))
            }
            SessionState::Backlog(backlog) => {
                if !backlog.decide(pool, &self.user, value)? {
                    return Ok(Decided::Next);
                }

                self.state = SessionState::Idle {
                    message: Some(NO_UNVOTED_MESSAGE.to_string()),
                };
                Ok(Decided::Exhausted)
            }
            SessionState::Idle { .. } | SessionState::Complete { .. } => {
                Err(AppError::NoActiveItem)
            }
        }
    }

    /// Persist the sequential cursor. Idempotent; a no-op in other states.
    pub fn flush(&self, pool: &mut DbPool) -> AppResult<()> {
        if let SessionState::Sequential(seq) = &self.state {
            advance_cursor(&pool.conn, &self.user, &seq.batch, seq.cursor)?;
        }
        Ok(())
    }

    /// Any browsing state → Idle, flushing the cursor first.
    pub fn cancel(&mut self, pool: &mut DbPool) -> AppResult<()> {
        self.flush(pool)?;
        self.state = SessionState::Idle { message: None };
        Ok(())
    }
}

/// Pop the next backlog candidate the user still has not decided.
///
/// Refills from the store below the low-water mark, and drops queued entries
/// that were decided meanwhile (by another session sharing the store).
fn next_candidate(
    conn: &Connection,
    user: &str,
    queue: &mut VecDeque<Item>,
) -> AppResult<Option<Item>> {
    loop {
        if queue.len() < LOW_WATER_MARK {
            let queued: Vec<i64> = queue.iter().map(|i| i.id).collect();
            let fresh = list_unvoted(conn, user, PREFETCH_SIZE - queue.len(), &queued)?;
            queue.extend(fresh);
        }

        let Some(head) = queue.pop_front() else {
            return Ok(None);
        };

        if has_decision(conn, head.id, user)? {
            continue;
        }

        return Ok(Some(head));
    }
}
