//! retl - Mirror cloud remotes into project directories.
//!
//! A project declares its remotes in `.retl.yaml`. retl authorizes each
//! backend type once through rclone's browser flow, writes a per-project
//! rclone config under the user config directory and runs `rclone sync` for
//! every declared file pair.
//!
//! Pipeline: Read config -> Write rclone config -> Authorize -> Write rclone config -> Sync

pub mod auth;
pub mod config;
pub mod error;
pub mod materialize;
pub mod pipeline;
pub mod sync;

// Re-export main types
pub use auth::{authorize_remotes, TokenCache};
pub use config::{FilePair, Remote, RemoteEntry, RetlConfig};
pub use error::{Result, RetlError};
pub use materialize::{render, write_rclone_config};
pub use pipeline::{Authorized, Pipeline};
pub use sync::{sync_remotes, Rclone, SyncOptions, SyncReport, SyncTool};
