//! CLI definitions and command implementations for retl.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// retl - Mirror cloud remotes declared in .retl.yaml into this project
#[derive(Parser)]
#[command(name = "retl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project directory containing .retl.yaml
    #[arg(short = 'C', long = "dir", global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Directory for generated rclone configs (default: <user config dir>/retl)
    #[arg(long, global = true, env = "RETL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// rclone executable (default: bundled next to retl, else rclone on PATH)
    #[arg(long, global = true, env = "RETL_RCLONE")]
    pub rclone: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Authorize remotes, write the rclone config and mirror every file pair (default)
    Sync {
        /// Continue with remaining file pairs after a failed sync
        #[arg(long)]
        keep_going: bool,

        /// Pass --dry-run to every rclone sync
        #[arg(long)]
        dry_run: bool,
    },

    /// Authorize remotes and write the rclone config without syncing
    Auth,

    /// Show configured remotes, token state and file pairs
    Status,
}

impl Default for Commands {
    fn default() -> Self {
        Self::Sync {
            keep_going: false,
            dry_run: false,
        }
    }
}
