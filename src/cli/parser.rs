use crate::export::ExportFormat;
use crate::models::BrowserChoice;
use clap::{Parser, Subcommand};

/// Command-line interface definition for steamvoter
#[derive(Parser)]
#[command(
    name = "steamvoter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Triage a CSV list of Steam games: view each store page, vote yes/no, export the results",
    long_about = None
)]
pub struct Cli {
    /// Override database path (remembered as last used)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Voter id (defaults to the configured user)
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Import games from a CSV file into a batch
    Import {
        /// CSV with name, developers, release_date, steam_page_url
        file: String,

        #[arg(long, help = "Batch name (default: file name without extension)")]
        batch: Option<String>,
    },

    /// Vote through a batch in order, resuming where you stopped
    Vote {
        batch: String,

        #[arg(long, value_enum, help = "Viewer for the store pages")]
        browser: Option<BrowserChoice>,
    },

    /// Vote on random games you have not voted on yet, across all batches
    Backlog {
        #[arg(long, value_enum, help = "Viewer for the store pages")]
        browser: Option<BrowserChoice>,
    },

    /// Show progress per batch
    Status,

    /// Export votes: new yes votes, or a full yes/no snapshot of one batch
    Export {
        #[arg(long, help = "Write <batch>_yes_votes / <batch>_no_votes instead")]
        batch: Option<String>,

        #[arg(long, value_name = "DIR", help = "Output directory (default: export_dir)")]
        dir: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, short = 'f', help = "Overwrite existing files without asking")]
        force: bool,
    },

    /// Delete every game, vote and progress cursor
    Wipe {
        #[arg(long, help = "Required: wipe the whole store")]
        all: bool,

        #[arg(long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}
