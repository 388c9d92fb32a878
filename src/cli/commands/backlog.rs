use crate::cli::commands::prompt::run_session;
use crate::cli::commands::{export_target, open_store};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{Session, SessionState};
use crate::db::queries::count_unvoted;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::ui::messages::info;
use crate::viewer::make_viewer;
use std::io;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backlog { browser } = cmd {
        let mut pool = open_store(cfg)?;
        let mut session = Session::new(&cfg.user, export_target(cfg, None, ExportFormat::Csv));

        if let SessionState::Idle {
            message: Some(message),
        } = session.start_backlog(&mut pool)?
        {
            info(message);
            return Ok(());
        }

        info(format!(
            "{} game(s) without a vote from {}, in random order.",
            count_unvoted(&pool.conn, &cfg.user)?,
            cfg.user
        ));

        let mut viewer = make_viewer(browser.unwrap_or(cfg.browser), cfg.keep_on_top);
        run_session(&mut pool, &mut session, viewer.as_mut(), &mut io::stdin().lock())?;
    }

    Ok(())
}
