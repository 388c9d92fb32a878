// src/export/fs_utils.rs

use super::ExportTarget;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{ask_confirmation, info};
use crate::utils::time::file_stamp;
use std::io;
use std::path::{Path, PathBuf};

/// Check whether a file can be created or overwritten.
///
/// - file does not exist → Ok
/// - exists and `force` → Ok
/// - exists and not `force` → ask the user.
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    let prompt = format!("The file '{}' already exists. Overwrite?", path.display());
    if ask_confirmation(&mut io::stdin().lock(), &prompt) {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "export cancelled: existing file not overwritten".to_string(),
        ))
    }
}

/// `<dir>/<batch>_yes_votes.<ext>` and `<dir>/<batch>_no_votes.<ext>`.
pub fn snapshot_paths(target: &ExportTarget, batch: &str) -> (PathBuf, PathBuf) {
    let ext = target.format.extension();
    let safe = sanitize(batch);
    (
        target.dir.join(format!("{safe}_yes_votes.{ext}")),
        target.dir.join(format!("{safe}_no_votes.{ext}")),
    )
}

/// `<dir>/new_yes_votes_<YYYYmmdd_HHMMSS>.<ext>`
pub fn new_votes_path(target: &ExportTarget) -> PathBuf {
    target.dir.join(format!(
        "new_yes_votes_{}.{}",
        file_stamp(),
        target.format.extension()
    ))
}

/// Keep batch names usable as file names on every platform.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
