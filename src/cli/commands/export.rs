use crate::cli::commands::{export_target, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::errors::AppResult;
use crate::export::{ensure_writable, snapshot_paths};
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        batch,
        dir,
        format,
        force,
    } = cmd
    {
        let mut pool = open_store(cfg)?;
        let target = export_target(cfg, dir.as_deref(), *format);

        match batch {
            Some(batch) => {
                let (yes_path, no_path) = snapshot_paths(&target, batch);
                ensure_writable(&yes_path, *force)?;
                ensure_writable(&no_path, *force)?;

                let snap = ExportLogic::export_batch_snapshot(&mut pool, batch, &cfg.user, &target)?;
                success(format!(
                    "Batch '{}': {} yes, {} no.",
                    snap.batch, snap.yes_count, snap.no_count
                ));
            }
            None => {
                let res = ExportLogic::export_new_positive(&mut pool, &cfg.user, &target)?;
                if res.written > 0 {
                    info(format!("{} new yes vote(s) exported.", res.written));
                }
            }
        }
    }

    Ok(())
}
