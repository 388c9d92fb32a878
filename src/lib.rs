//! steamvoter library root.
//! Exposes the CLI parser, the high-level run() function, and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;
pub mod viewer;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use ui::messages::warning;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Import { .. } => cli::commands::import::handle(&cli.command, cfg),
        Commands::Vote { .. } => cli::commands::vote::handle(&cli.command, cfg),
        Commands::Backlog { .. } => cli::commands::backlog::handle(&cli.command, cfg),
        Commands::Status => cli::commands::status::handle(cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Wipe { .. } => cli::commands::wipe::handle(&cli.command, cfg),
    }
}

/// Viewer passed on the command line, if the command takes one.
fn browser_override(cmd: &Commands) -> Option<models::BrowserChoice> {
    match cmd {
        Commands::Vote { browser, .. } | Commands::Backlog { browser } => *browser,
        _ => None,
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load();

    // 3️⃣ remember --db / --browser as last used (init saves on its own)
    let changed = cfg.remember(cli.db.as_deref(), browser_override(&cli.command));
    if changed
        && !cli.test
        && !matches!(cli.command, Commands::Init)
        && let Err(e) = cfg.save()
    {
        warning(format!("Could not save configuration: {}", e));
    }

    // 4️⃣ --user applies to this run only
    if let Some(user) = &cli.user {
        cfg.user = user.clone();
    }

    // 5️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
