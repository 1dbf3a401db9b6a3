//! retl CLI - Mirror cloud remotes declared in .retl.yaml
//!
//! Usage:
//!   retl          - Authorize remotes and sync every file pair
//!   retl auth     - Authorize remotes and write the rclone config
//!   retl status   - Show remotes, token state and file pairs

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("retl={}", log_level).parse()?),
        )
        .with_target(false)
        .init();

    match cli.command.clone().unwrap_or_default() {
        Commands::Sync {
            keep_going,
            dry_run,
        } => cli::commands::sync(&cli, keep_going, dry_run),
        Commands::Auth => cli::commands::auth(&cli),
        Commands::Status => cli::commands::status(&cli),
    }
}
