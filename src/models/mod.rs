pub mod browser;
pub mod decision;
pub mod item;
pub mod progress;

pub use browser::BrowserChoice;
pub use decision::{Decision, WritePolicy};
pub use item::{Item, NewItem};
pub use progress::{BatchSummary, Progress};
