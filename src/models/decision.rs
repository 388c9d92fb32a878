use serde::Serialize;

/// One user's yes/no vote on one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub id: i64,
    pub item_id: i64,
    pub user_id: String,
    pub value: bool,
    pub recorded_at: String, // RFC 3339, set at write time
    pub exported: bool,
}

/// How a decision write treats an existing vote for the same `(item, user)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Replace value and timestamp (sequential browsing).
    Overwrite,
    /// Keep the existing vote and drop the new one (backlog browsing).
    FirstWins,
}

impl Decision {
    /// Convert DB integer → bool
    pub fn value_from_db(v: i64) -> bool {
        v != 0
    }

    /// Convert bool → DB integer
    pub fn value_to_db(v: bool) -> i64 {
        if v { 1 } else { 0 }
    }
}
