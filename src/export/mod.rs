// src/export/mod.rs

pub(crate) mod fs_utils;
mod json_csv;
pub(crate) mod model;

pub use fs_utils::{ensure_writable, new_votes_path, snapshot_paths};
pub use model::{GameExport, NewVoteExport};

use crate::errors::AppResult;
use crate::ui::messages::success;
use clap::ValueEnum;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Shared helper for completion messages.
pub(crate) fn notify_export_success(label: &str, path: &Path, rows: usize) {
    success(format!(
        "{label} export completed: {} ({} row(s))",
        path.display(),
        rows
    ));
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// File extension, same as the format name.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

/// Where and how exports are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportTarget {
    pub dir: PathBuf,
    pub format: ExportFormat,
}

impl ExportTarget {
    pub fn new(dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }
}

/// Write `rows` at `path` in `format`. CSV always carries a header row,
/// even when `rows` is empty.
pub(crate) fn write_rows<T: Serialize>(
    format: ExportFormat,
    rows: &[T],
    headers: &[&str],
    path: &Path,
) -> AppResult<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    match format {
        ExportFormat::Csv => json_csv::export_csv(rows, headers, path)?,
        ExportFormat::Json => json_csv::export_json(rows, path)?,
    }

    notify_export_success(&format.as_str().to_uppercase(), path, rows.len());
    Ok(())
}
