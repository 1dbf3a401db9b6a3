//! SyncTool trait - Abstraction over the external sync executable.
//!
//! The orchestration only needs two capabilities from the tool: running an
//! authorization handshake for a backend type, and mirroring a remote path
//! into a local directory. `Rclone` implements both over the rclone CLI.

use std::path::Path;

use crate::error::Result;

pub trait SyncTool {
    /// Tool name, used in log messages
    fn name(&self) -> &'static str;

    /// Run the interactive authorization handshake for a backend type and
    /// return the token it produces.
    fn authorize(&self, backend_type: &str) -> Result<String>;

    /// Mirror `source` (`<remote>:<path>`) onto the local `target`.
    fn sync(&self, source: &str, target: &Path) -> Result<()>;
}
