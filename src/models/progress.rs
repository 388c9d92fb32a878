/// Position of the current item inside a sequential batch (1-based for display).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

/// Per-batch overview for one user, as shown by `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub batch_name: String,
    pub items: usize,
    pub decided: usize,
    pub yes: usize,
    pub cursor: usize,
}

impl BatchSummary {
    pub fn is_complete(&self) -> bool {
        self.items > 0 && self.cursor >= self.items
    }
}
