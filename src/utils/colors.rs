/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Returns GREY when the field is empty, RESET otherwise.
pub fn color_for_optional_field<T: AsRef<str>>(value: Option<T>) -> &'static str {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() => RESET,
        _ => GREY,
    }
}

/// Vote color: yes → green, no → red.
pub fn color_for_vote(value: bool) -> &'static str {
    if value { GREEN } else { RED }
}

/// Colors a batch completion ratio: done → green, untouched → grey, otherwise yellow.
pub fn color_for_progress(done: usize, total: usize) -> &'static str {
    if total > 0 && done >= total {
        GREEN
    } else if done == 0 {
        GREY
    } else {
        YELLOW
    }
}

pub fn colorize_vote(value: bool) -> String {
    format!(
        "{}{}{}",
        color_for_vote(value),
        super::formatting::yes_no(value),
        RESET
    )
}
