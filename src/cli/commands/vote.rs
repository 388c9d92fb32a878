use crate::cli::commands::prompt::run_session;
use crate::cli::commands::{export_target, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{Session, SessionState};
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::ui::messages::{info, success};
use crate::viewer::make_viewer;
use std::io;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Vote { batch, browser } = cmd {
        let mut pool = open_store(cfg)?;
        let mut session = Session::new(&cfg.user, export_target(cfg, None, ExportFormat::Csv));

        match session.load_batch(&mut pool, batch)? {
            SessionState::Complete { batch } => {
                success(format!(
                    "Batch '{}' is already complete for {}. Use `export --batch {}` to rewrite its files.",
                    batch, cfg.user, batch
                ));
                return Ok(());
            }
            SessionState::Sequential(seq) => {
                if seq.cursor() > 0 {
                    info(format!(
                        "Resuming '{}' at game {} of {}.",
                        seq.batch,
                        seq.cursor() + 1,
                        seq.len()
                    ));
                }
            }
            _ => {}
        }

        let mut viewer = make_viewer(browser.unwrap_or(cfg.browser), cfg.keep_on_top);
        run_session(&mut pool, &mut session, viewer.as_mut(), &mut io::stdin().lock())?;
    }

    Ok(())
}
