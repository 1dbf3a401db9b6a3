//! Sync module - Mirrors remote paths into the project via an external tool.
//!
//! This module contains:
//! - SyncTool trait for abstraction
//! - Rclone tool (command execution, authorize, sync)
//! - Executor that walks every configured file pair

pub mod executor;
pub mod rclone;
pub mod tool;

pub use executor::{sync_remotes, SyncOptions, SyncReport};
pub use rclone::{parse_authorize_output, Rclone};
pub use tool::SyncTool;
