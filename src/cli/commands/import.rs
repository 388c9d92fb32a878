use crate::cli::commands::open_store;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::ImportLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::path::{batch_name_from_path, expand_tilde};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file, batch } = cmd {
        let batch = match batch {
            Some(b) => b.clone(),
            None => batch_name_from_path(file).ok_or_else(|| {
                AppError::Import(format!("cannot derive a batch name from '{}'", file))
            })?,
        };

        let mut pool = open_store(cfg)?;
        let report = ImportLogic::import_file(&mut pool, &expand_tilde(file), &batch)?;

        success(format!(
            "Batch '{}': {} game(s) imported, {} duplicate(s) ignored.",
            report.batch, report.imported, report.duplicates
        ));

        if report.skipped > 0 {
            warning(format!(
                "{} row(s) skipped (lines: {}).",
                report.skipped,
                report
                    .skipped_lines
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }

    Ok(())
}
