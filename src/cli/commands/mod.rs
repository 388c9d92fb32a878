pub mod backlog;
pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub(crate) mod prompt;
pub mod status;
pub mod vote;
pub mod wipe;

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::{ExportFormat, ExportTarget};
use crate::utils::path::expand_tilde;

/// Open the configured store, running pending migrations.
pub(crate) fn open_store(cfg: &Config) -> AppResult<DbPool> {
    let path = expand_tilde(&cfg.database);
    DbPool::open(&path.to_string_lossy())
}

pub(crate) fn export_target(cfg: &Config, dir: Option<&str>, format: ExportFormat) -> ExportTarget {
    ExportTarget::new(expand_tilde(dir.unwrap_or(&cfg.export_dir)), format)
}
