//! intellibuild CLI - ib command

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

/// intellibuild - rebuild only the projects your changes touch
#[derive(Parser)]
#[command(name = "ib")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select and build the projects affected by working tree changes
    Run {
        /// Repository root (default: current directory)
        path: Option<PathBuf>,

        /// Build every selected project without asking
        #[arg(short = 'y', long)]
        yes: bool,

        /// Print the build plan instead of compiling
        #[arg(long)]
        dry_run: bool,

        /// Run the environment bootstrap even if it is not due
        #[arg(long)]
        force_bootstrap: bool,

        /// Ignore the cached dependency map and rescan every project
        #[arg(long)]
        rebuild_cache: bool,
    },
    /// Show what a run would do, without building or saving anything
    Status {
        /// Repository root (default: current directory)
        path: Option<PathBuf>,
    },
    /// View and edit settings stored in the repository cache
    Config {
        /// Repository root (default: current directory)
        path: Option<PathBuf>,

        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List all settings
    List,
    /// Get a single setting
    Get {
        /// Setting key (e.g. compiler.program)
        key: String,
    },
    /// Set a setting
    Set {
        /// Setting key (e.g. compiler.program)
        key: String,
        /// New value (empty clears optional settings)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli_lib::logging::init(cli.verbose);

    match cli.command {
        Commands::Run {
            path,
            yes,
            dry_run,
            force_bootstrap,
            rebuild_cache,
        } => {
            let options = cmd::run::RunOptions {
                assume_yes: yes,
                dry_run,
                force_bootstrap,
                rebuild_cache,
            };
            cmd::run::run(path.as_deref(), options).await
        }
        Commands::Status { path } => cmd::status::run(path.as_deref()).await,
        Commands::Config { path, action } => match action {
            ConfigAction::List => cmd::config::run_list(path.as_deref()),
            ConfigAction::Get { key } => cmd::config::run_get(path.as_deref(), &key),
            ConfigAction::Set { key, value } => cmd::config::run_set(path.as_deref(), &key, &value),
        },
    }
}
