//! Command implementations for the retl CLI.
//!
//! - sync: authorize, write the rclone config and mirror every file pair
//! - auth: authorize and write the rclone config only
//! - status: read-only overview of the project

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use retl::config::{config_file_path, default_config_dir, project_name};
use retl::materialize::rclone_config_path;
use retl::{Pipeline, Rclone, RetlConfig, SyncOptions};

use super::Cli;

/// Build the pipeline from global CLI options.
fn pipeline(cli: &Cli, dry_run: bool) -> Pipeline {
    let mut rclone = match &cli.rclone {
        Some(path) => Rclone::with_binary(path),
        None => Rclone::new(),
    };
    if dry_run {
        rclone = rclone.with_sync_flag("--dry-run");
    }

    Pipeline::new(&cli.project_dir, config_dir(cli), rclone)
}

fn config_dir(cli: &Cli) -> PathBuf {
    cli.config_dir.clone().unwrap_or_else(default_config_dir)
}

/// Authorize remotes and mirror every file pair.
pub fn sync(cli: &Cli, keep_going: bool, dry_run: bool) -> Result<()> {
    println!("{}", "🔄 retl sync".bold().cyan());

    let options = SyncOptions { keep_going };
    let report = pipeline(cli, dry_run)
        .sync(&options)
        .context("Sync did not complete")?;

    println!(
        "{} {} file pair(s) synced",
        "✓".green(),
        report.synced.to_string().bold()
    );
    Ok(())
}

/// Authorize remotes and write the rclone config without syncing.
pub fn auth(cli: &Cli) -> Result<()> {
    println!("{}", "🔐 retl auth".bold().cyan());

    let authorized = pipeline(cli, false)
        .authorize()
        .context("Authorization failed")?;

    println!(
        "{} {} remote(s) authorized",
        "✓".green(),
        authorized.config.len()
    );
    println!(
        "  rclone config: {}",
        authorized.config_file.display().to_string().dimmed()
    );
    Ok(())
}

/// Show remotes, token state and file pairs.
pub fn status(cli: &Cli) -> Result<()> {
    let project_dir = &cli.project_dir;
    let config = RetlConfig::load(project_dir)?;
    let name = project_name(project_dir)?;
    let rclone_config = rclone_config_path(&config_dir(cli), &name);

    println!("{} {}", "📦 Project:".bold().cyan(), name.bold());
    println!("  Config: {}", config_file_path(project_dir).display());
    println!(
        "  rclone config: {} {}",
        rclone_config.display(),
        written_label(&rclone_config)
    );
    println!();

    if config.is_empty() {
        println!("{}", "No remotes configured.".yellow());
        return Ok(());
    }

    for remote in config.remotes() {
        let token = if remote.entry.is_authorized() {
            "✓ token".green()
        } else {
            "✗ not authorized".yellow()
        };
        println!(
            "  {} [{}] {}",
            remote.name.white().bold(),
            remote.entry.remote_type.cyan(),
            token
        );
        for pair in &remote.entry.files {
            println!("     {}:{} -> {}", remote.name, pair.source, pair.target);
        }
    }

    println!();
    println!(
        "{} remote(s), {} file pair(s)",
        config.len(),
        config.file_pair_count()
    );
    Ok(())
}

fn written_label(path: &Path) -> colored::ColoredString {
    if path.exists() {
        "(written)".dimmed()
    } else {
        "(not written yet)".dimmed()
    }
}
