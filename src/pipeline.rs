//! Pipeline - Read config, authorize, write rclone config, sync.
//!
//! The rclone config is written twice: once before authorization so the
//! handshake commands already run against the project's config file, and
//! once after so the file on disk carries the final tokens.

use std::path::PathBuf;

use tracing::info;

use crate::auth::{authorize_remotes, TokenCache};
use crate::config::{project_name, RetlConfig};
use crate::error::Result;
use crate::materialize::write_rclone_config;
use crate::sync::{sync_remotes, Rclone, SyncOptions, SyncReport};

/// Result of the authorization phase.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub project_name: String,
    /// Config with a token on every remote
    pub config: RetlConfig,
    /// Generated rclone config file
    pub config_file: PathBuf,
    /// Rclone bound to `config_file`
    pub rclone: Rclone,
}

/// One retl run for a project directory.
#[derive(Debug, Clone)]
pub struct Pipeline {
    project_dir: PathBuf,
    config_dir: PathBuf,
    rclone: Rclone,
}

impl Pipeline {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        config_dir: impl Into<PathBuf>,
        rclone: Rclone,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            config_dir: config_dir.into(),
            rclone,
        }
    }

    /// Authorize every remote and persist the resulting rclone config.
    pub fn authorize(&self) -> Result<Authorized> {
        let config = RetlConfig::load(&self.project_dir)?;
        let project_name = project_name(&self.project_dir)?;

        let config_file = write_rclone_config(&self.config_dir, &project_name, &config)?;
        let rclone = self.rclone.clone().with_config_file(&config_file);

        let mut cache = TokenCache::new();
        let config = authorize_remotes(config, &rclone, &mut cache)?;

        let config_file = write_rclone_config(&self.config_dir, &project_name, &config)?;
        let rclone = rclone.with_config_file(&config_file);

        Ok(Authorized {
            project_name,
            config,
            config_file,
            rclone,
        })
    }

    /// Full run: authorize, then mirror every file pair.
    pub fn sync(&self, options: &SyncOptions) -> Result<SyncReport> {
        info!("Starting retl in {}", self.project_dir.display());

        let authorized = self.authorize()?;
        let report = sync_remotes(
            &authorized.config,
            &authorized.rclone,
            &self.project_dir,
            options,
        )?;

        info!(
            "Finished retl for '{}': {} file pair(s) synced",
            authorized.project_name, report.synced
        );
        Ok(report)
    }
}
