//! Timestamp helpers shared by the store and the exporters.

use chrono::{Local, SecondsFormat};

/// Local time, RFC 3339 with microseconds. Sorts correctly as text within one offset.
pub fn now_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Compact stamp for export/backup file names (e.g. `20250901_173000`).
pub fn file_stamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Render a stored timestamp for humans; falls back to the raw text.
pub fn display_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%F %T").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
