//! Writes the rclone config file for a project.
//!
//! Output is rclone's INI-like format, one section per remote:
//!
//! ```text
//! [remoteA]
//! type = x
//! token = t1
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, info};

use crate::config::{RemoteEntry, RetlConfig};
use crate::error::Result;

/// Keys that belong to retl rather than rclone.
pub const IGNORED_RETL_FIELDS: &[&str] = &["files"];

/// Path of the generated rclone config for a project.
pub fn rclone_config_path(config_dir: &Path, project_name: &str) -> PathBuf {
    config_dir.join(format!("{}.conf", project_name))
}

/// Render the whole config as rclone config text.
pub fn render(config: &RetlConfig) -> String {
    config
        .remotes()
        .iter()
        .flat_map(|remote| section_lines(&remote.name, &remote.entry))
        .map(|line| line + "\n")
        .collect()
}

/// Section header plus one `key = value` line per field, in the entry's
/// own key order.
fn section_lines(name: &str, entry: &RemoteEntry) -> Vec<String> {
    let mut lines = vec![format!("[{}]", name)];

    for key in entry.field_order() {
        let value = match key.as_str() {
            Some(k) if IGNORED_RETL_FIELDS.contains(&k) => continue,
            Some("type") => entry.remote_type.clone(),
            Some("token") => match &entry.token {
                Some(token) => token.clone(),
                None => continue,
            },
            _ => match entry.options.get(&key) {
                Some(value) => render_value(value),
                None => continue,
            },
        };
        lines.push(format!("{} = {}", render_value(&key), value));
    }

    lines
}

/// Plain text for scalars, compact JSON for nested values.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => render_value(&tagged.value),
        nested => serde_json::to_string(nested).unwrap_or_default(),
    }
}

/// Write `<config_dir>/<project_name>.conf`, replacing any previous file.
///
/// The directory is created if missing. On Unix the file is restricted to
/// the current user since it carries access tokens.
pub fn write_rclone_config(
    config_dir: &Path,
    project_name: &str,
    config: &RetlConfig,
) -> Result<PathBuf> {
    info!("Setting up rclone config file at {}.", config_dir.display());
    fs::create_dir_all(config_dir)?;

    let path = rclone_config_path(config_dir, project_name);
    fs::write(&path, render(config))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    debug!("Wrote {} remote(s) to {}", config.len(), path.display());
    Ok(path)
}
