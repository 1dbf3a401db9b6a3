//! Error kinds surfaced by retl.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetlError {
    #[error("Config file {} not found.", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Cannot parse config file {}: {source}", .path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid entry for remote '{remote}': {source}")]
    InvalidRemote {
        remote: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Remote names must be strings, found: {0}")]
    InvalidRemoteName(String),

    #[error("Cannot determine project name from {}", .0.display())]
    InvalidProjectDir(PathBuf),

    #[error("Rclone command `{command}` failed ({}): {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unexpected authorization output: {0:?}")]
    UnexpectedAuthorizeOutput(String),

    #[error("{failed} of {total} file syncs failed")]
    SyncIncomplete { failed: usize, total: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RetlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_names_path() {
        let err = RetlError::ConfigNotFound(PathBuf::from("/work/proj/.retl.yaml"));
        assert_eq!(err.to_string(), "Config file /work/proj/.retl.yaml not found.");
    }

    #[test]
    fn test_command_failed_includes_stderr() {
        let err = RetlError::CommandFailed {
            command: "rclone authorize drive".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.ends_with("boom"));
    }
}
