//! Path utilities: expand ~, resolve the export directory.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// File stem of a CSV path, used as default batch name ("games/indie2024.csv" → "indie2024").
pub fn batch_name_from_path(path: &str) -> Option<String> {
    PathBuf::from(path)
        .file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .filter(|s| !s.is_empty())
}
