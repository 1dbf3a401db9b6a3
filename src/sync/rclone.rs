use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, error, info};

use crate::error::{Result, RetlError};
use crate::sync::tool::SyncTool;

/// Rclone sync tool.
/// Wraps the rclone command line tool, optionally bound to a config file.
#[derive(Debug, Clone)]
pub struct Rclone {
    rclone_path: PathBuf,
    config_file: Option<PathBuf>,
    sync_flags: Vec<String>,
}

impl Rclone {
    /// Create with the discovered rclone binary and no config file.
    pub fn new() -> Self {
        Self::with_binary(Self::find_rclone())
    }

    /// Create with an explicit rclone binary.
    pub fn with_binary(rclone_path: impl Into<PathBuf>) -> Self {
        Self {
            rclone_path: rclone_path.into(),
            config_file: None,
            sync_flags: Vec::new(),
        }
    }

    /// Bind every subsequent command to a generated config file.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Extra flag appended to every `rclone sync` (e.g. `--dry-run`).
    pub fn with_sync_flag(mut self, flag: impl Into<String>) -> Self {
        self.sync_flags.push(flag.into());
        self
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Locate rclone binary.
    fn find_rclone() -> PathBuf {
        let binary = if cfg!(windows) { "rclone.exe" } else { "rclone" };

        // Bundled next to the retl executable
        if let Ok(current_exe) = std::env::current_exe() {
            if let Some(bin_dir) = current_exe.parent() {
                let bundled_path = bin_dir.join(binary);
                if bundled_path.exists() {
                    return bundled_path;
                }
            }
        }

        debug!("[Rclone] Falling back to system PATH for rclone");
        PathBuf::from(binary)
    }

    /// Arguments passed to rclone. `--config=<path>` always comes first so
    /// it precedes the subcommand.
    pub fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut argv: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        if let Some(config_file) = &self.config_file {
            argv.insert(0, format!("--config={}", config_file.display()));
        }
        argv
    }

    /// Run rclone command and return its stdout, or `None` if it printed nothing.
    pub fn run(&self, args: &[&str]) -> Result<Option<String>> {
        let argv = self.command_args(args);
        let command = format!("{} {}", self.rclone_path.display(), argv.join(" "));
        debug!("[Rclone] Running: {}", command);

        let output = Command::new(&self.rclone_path)
            .args(&argv)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .inspect_err(|e| error!("Cannot execute {}: {}", self.rclone_path.display(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("Rclone command failed: {}", stderr);
            return Err(RetlError::CommandFailed {
                command,
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.is_empty() {
            Ok(None)
        } else {
            Ok(Some(stdout))
        }
    }
}

impl Default for Rclone {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the token from `rclone authorize` output.
///
/// The first line is a status message, the second carries the token.
pub fn parse_authorize_output(output: &str) -> Result<String> {
    match output.lines().nth(1).map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(RetlError::UnexpectedAuthorizeOutput(output.to_string())),
    }
}

impl SyncTool for Rclone {
    fn name(&self) -> &'static str {
        "rclone"
    }

    fn authorize(&self, backend_type: &str) -> Result<String> {
        info!("[Rclone] Browser will open to authorize '{}'.", backend_type);
        let output = self.run(&["authorize", backend_type])?.unwrap_or_default();
        parse_authorize_output(&output)
    }

    fn sync(&self, source: &str, target: &Path) -> Result<()> {
        let target = target.to_string_lossy();
        info!("[Rclone] Syncing {} to {}...", source, target);

        let mut args = vec!["sync", source, &*target];
        args.extend(self.sync_flags.iter().map(String::as_str));

        if let Some(stdout) = self.run(&args)? {
            debug!("[Rclone] {}", stdout.trim_end());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_without_config() {
        let rclone = Rclone::with_binary("rclone");
        assert_eq!(
            rclone.command_args(&["authorize", "drive"]),
            ["authorize", "drive"]
        );
    }

    #[test]
    fn test_command_args_config_comes_first() {
        let rclone = Rclone::with_binary("rclone").with_config_file("/tmp/retl/proj.conf");
        assert_eq!(
            rclone.command_args(&["authorize", "drive"]),
            ["--config=/tmp/retl/proj.conf", "authorize", "drive"]
        );
    }

    #[test]
    fn test_rebinding_config_file() {
        let rclone = Rclone::with_binary("rclone")
            .with_config_file("/a.conf")
            .with_config_file("/b.conf");
        assert_eq!(rclone.config_file(), Some(Path::new("/b.conf")));
    }

    #[test]
    fn test_parse_authorize_output_second_line() {
        let token = parse_authorize_output("Please visit URL\nTOKEN123\n").unwrap();
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn test_parse_authorize_output_trims_crlf() {
        let token = parse_authorize_output("Please visit URL\r\nTOKEN123\r\n").unwrap();
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn test_parse_authorize_output_too_short() {
        for output in ["", "only one line\n", "status\n\n"] {
            let err = parse_authorize_output(output).unwrap_err();
            assert!(matches!(err, RetlError::UnexpectedAuthorizeOutput(_)));
        }
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let rclone = Rclone::with_binary("/nonexistent/retl-test-rclone");
        let err = rclone.run(&["version"]).unwrap_err();
        assert!(matches!(err, RetlError::Io(_)));
    }
}
