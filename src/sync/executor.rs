//! Runs one sync per configured file pair, sequentially and in config order.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::RetlConfig;
use crate::error::{Result, RetlError};
use crate::sync::tool::SyncTool;

/// Options for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Attempt every file pair even after a failure, then fail at the end
    pub keep_going: bool,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Number of file pairs synced successfully
    pub synced: usize,
}

/// `<remote>:<source>` as understood by rclone.
pub fn remote_source(remote: &str, source: &str) -> String {
    format!("{}:{}", remote, source)
}

/// Resolve a local target against the project directory.
pub fn resolve_target(project_dir: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    if target.is_absolute() {
        target.to_path_buf()
    } else {
        project_dir.join(target)
    }
}

/// Sync every file pair of every remote.
///
/// Stops at the first failure unless `options.keep_going` is set, in which
/// case all pairs are attempted and `RetlError::SyncIncomplete` is returned
/// if any failed.
pub fn sync_remotes(
    config: &RetlConfig,
    tool: &dyn SyncTool,
    project_dir: &Path,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let mut report = SyncReport::default();
    let mut failed = 0;

    for remote in config.remotes() {
        info!("Cloning files for remote '{}' with {}:", remote.name, tool.name());

        for pair in &remote.entry.files {
            let source = remote_source(&remote.name, &pair.source);
            let target = resolve_target(project_dir, &pair.target);

            match tool.sync(&source, &target) {
                Ok(()) => report.synced += 1,
                Err(e) if options.keep_going => {
                    error!("Sync of {} failed, continuing: {}", source, e);
                    failed += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    if failed > 0 {
        return Err(RetlError::SyncIncomplete {
            failed,
            total: config.file_pair_count(),
        });
    }

    Ok(report)
}
