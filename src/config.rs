//! Config module - Reads the per-project `.retl.yaml`.
//!
//! The file maps remote names to their backend type, an optional cached
//! token, the file pairs to mirror and any extra rclone options:
//!
//! ```yaml
//! wolke:
//!   type: webdav
//!   url: https://cloud.example.org/remote.php/dav/files/me
//!   vendor: nextcloud
//!   files:
//!     - source: Projects/data
//!       target: ./data
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::error::{Result, RetlError};

pub const APP_NAME: &str = "retl";

/// Name of the project config file, looked up in the project directory.
pub const CONFIG_RETL_FILENAME: &str = ".retl.yaml";

/// A local mirror of a path on a remote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilePair {
    /// Path on the remote
    pub source: String,
    /// Local path (relative paths resolve against the project directory)
    pub target: String,
}

/// Settings of a single remote.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteEntry {
    /// Backend identifier understood by rclone (e.g. "drive", "dropbox")
    #[serde(rename = "type")]
    pub remote_type: String,

    /// Access token, absent until authorized
    #[serde(default, deserialize_with = "scalar_token")]
    pub token: Option<String>,

    /// File pairs to mirror; never written to the rclone config
    pub files: Vec<FilePair>,

    /// Remaining keys, passed through to rclone verbatim
    #[serde(flatten)]
    pub options: Mapping,

    /// Keys as they appeared in `.retl.yaml`; empty for entries built in code
    #[serde(skip)]
    pub key_order: Vec<Value>,
}

/// Tokens are kept as text whatever scalar YAML read them as.
fn scalar_token<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "token must be a scalar, found {:?}",
            other
        ))),
    }
}

impl RemoteEntry {
    pub fn new(remote_type: impl Into<String>) -> Self {
        Self {
            remote_type: remote_type.into(),
            token: None,
            files: Vec::new(),
            options: Mapping::new(),
            key_order: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_file(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.files.push(FilePair {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(Value::String(key.into()), value.into());
        self
    }

    pub fn is_authorized(&self) -> bool {
        self.token.is_some()
    }

    /// Keys in rclone config order: source order first, then `type` if it
    /// never appeared, options added in code, and a token obtained later.
    pub fn field_order(&self) -> Vec<Value> {
        let mut order = self.key_order.clone();
        if !order.iter().any(|k| k.as_str() == Some("type")) {
            order.insert(0, Value::from("type"));
        }
        for key in self.options.keys() {
            if !order.contains(key) {
                order.push(key.clone());
            }
        }
        if !order.iter().any(|k| k.as_str() == Some("token")) {
            order.push(Value::from("token"));
        }
        order
    }
}

/// A named remote.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote {
    pub name: String,
    pub entry: RemoteEntry,
}

/// All remotes of a project, in the order they appear in `.retl.yaml`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RetlConfig {
    remotes: Vec<Remote>,
}

impl RetlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a remote. A remote with the same name is replaced in place.
    pub fn with_remote(mut self, name: impl Into<String>, entry: RemoteEntry) -> Self {
        let name = name.into();
        match self.remotes.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.entry = entry,
            None => self.remotes.push(Remote { name, entry }),
        }
        self
    }

    /// Load `.retl.yaml` from the project directory.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = config_file_path(project_dir);
        info!("Reading retl config file from {}.", path.display());

        if !path.exists() {
            return Err(RetlError::ConfigNotFound(path));
        }

        let content = fs::read_to_string(&path)?;
        Self::from_yaml(&content, &path)
    }

    /// Parse config content, resolving `<<` merge keys. `path` is only used
    /// for error messages.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let invalid = |source: serde_yaml::Error| RetlError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        };

        let mut value = serde_yaml::from_str::<Option<Value>>(content)
            .map_err(invalid)?
            .unwrap_or(Value::Null);
        value.apply_merge().map_err(invalid)?;
        let raw: Option<Mapping> = serde_yaml::from_value(value).map_err(invalid)?;

        let mut remotes = Vec::new();
        for (key, value) in raw.unwrap_or_default() {
            let name = match key {
                Value::String(name) => name,
                other => return Err(RetlError::InvalidRemoteName(format!("{:?}", other))),
            };
            let key_order = match &value {
                Value::Mapping(fields) => fields.keys().cloned().collect(),
                _ => Vec::new(),
            };
            let mut entry: RemoteEntry = serde_yaml::from_value(value).map_err(|source| {
                RetlError::InvalidRemote {
                    remote: name.clone(),
                    source,
                }
            })?;
            entry.key_order = key_order;
            remotes.push(Remote { name, entry });
        }

        Ok(Self { remotes })
    }

    pub fn remotes(&self) -> &[Remote] {
        &self.remotes
    }

    pub fn into_remotes(self) -> Vec<Remote> {
        self.remotes
    }

    pub fn get(&self, name: &str) -> Option<&RemoteEntry> {
        self.remotes
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.entry)
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }

    /// Total number of file pairs across all remotes.
    pub fn file_pair_count(&self) -> usize {
        self.remotes.iter().map(|r| r.entry.files.len()).sum()
    }
}

impl FromIterator<Remote> for RetlConfig {
    fn from_iter<I: IntoIterator<Item = Remote>>(iter: I) -> Self {
        Self {
            remotes: iter.into_iter().collect(),
        }
    }
}

/// Expected location of `.retl.yaml` for a project directory.
pub fn config_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_RETL_FILENAME)
}

/// Project name: base name of the project directory.
pub fn project_name(project_dir: &Path) -> Result<String> {
    let dir = project_dir.canonicalize()?;
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or(RetlError::InvalidProjectDir(dir))
}

/// Get default directory for generated rclone configs (~/.config/retl/).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}
