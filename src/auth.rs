//! Remote authorization.
//!
//! Every remote without a token gets one from the sync tool's interactive
//! handshake. Tokens are cached per backend type for the duration of a run,
//! so several remotes of the same type share a single handshake.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::{Remote, RetlConfig};
use crate::error::Result;
use crate::sync::SyncTool;

/// Tokens obtained during the current run, keyed by backend type.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    tokens: HashMap<String, String>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, backend_type: &str) -> Option<&str> {
        self.tokens.get(backend_type).map(String::as_str)
    }

    pub fn insert(&mut self, backend_type: impl Into<String>, token: impl Into<String>) {
        self.tokens.insert(backend_type.into(), token.into());
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Return a config in which every remote carries a token.
pub fn authorize_remotes(
    config: RetlConfig,
    tool: &dyn SyncTool,
    cache: &mut TokenCache,
) -> Result<RetlConfig> {
    info!("Authorizing remotes:");
    config
        .into_remotes()
        .into_iter()
        .map(|remote| authorize_remote(remote, tool, cache))
        .collect()
}

fn authorize_remote(
    mut remote: Remote,
    tool: &dyn SyncTool,
    cache: &mut TokenCache,
) -> Result<Remote> {
    if remote.entry.is_authorized() {
        debug!("Remote '{}' already has a token", remote.name);
        return Ok(remote);
    }

    let backend_type = remote.entry.remote_type.clone();
    let token = match cache.get(&backend_type) {
        Some(token) => token.to_string(),
        None => {
            info!("Authorizing remote '{}' with {}", backend_type, tool.name());
            let token = tool.authorize(&backend_type)?;
            cache.insert(backend_type, token.clone());
            token
        }
    };

    remote.entry.token = Some(token);
    Ok(remote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteEntry;
    use crate::error::RetlError;
    use std::cell::RefCell;
    use std::path::Path;

    /// Hands out `token-<type>-<n>` and records every handshake.
    #[derive(Default)]
    struct FakeAuthorizer {
        calls: RefCell<Vec<String>>,
        fail: bool,
    }

    impl SyncTool for FakeAuthorizer {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn authorize(&self, backend_type: &str) -> Result<String> {
            if self.fail {
                return Err(RetlError::CommandFailed {
                    command: format!("authorize {}", backend_type),
                    code: Some(1),
                    stderr: "boom".to_string(),
                });
            }
            let mut calls = self.calls.borrow_mut();
            calls.push(backend_type.to_string());
            Ok(format!("token-{}-{}", backend_type, calls.len()))
        }

        fn sync(&self, _source: &str, _target: &Path) -> Result<()> {
            unreachable!("authorizer never syncs")
        }
    }

    #[test]
    fn test_authorized_config_is_unchanged() {
        let config = RetlConfig::new()
            .with_remote("a", RemoteEntry::new("drive").with_token("t1"))
            .with_remote("b", RemoteEntry::new("dropbox").with_token("t2"));
        let tool = FakeAuthorizer::default();
        let mut cache = TokenCache::new();

        let result = authorize_remotes(config.clone(), &tool, &mut cache).unwrap();

        assert_eq!(result, config);
        assert!(tool.calls.borrow().is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_type_authorizes_once() {
        let config = RetlConfig::new()
            .with_remote("one", RemoteEntry::new("drive"))
            .with_remote("two", RemoteEntry::new("drive"))
            .with_remote("three", RemoteEntry::new("drive"));
        let tool = FakeAuthorizer::default();
        let mut cache = TokenCache::new();

        let result = authorize_remotes(config, &tool, &mut cache).unwrap();

        assert_eq!(*tool.calls.borrow(), ["drive"]);
        for remote in result.remotes() {
            assert_eq!(remote.entry.token.as_deref(), Some("token-drive-1"));
        }
        assert_eq!(cache.get("drive"), Some("token-drive-1"));
    }

    #[test]
    fn test_distinct_types_authorize_separately_in_order() {
        let config = RetlConfig::new()
            .with_remote("box", RemoteEntry::new("dropbox"))
            .with_remote("gdrive", RemoteEntry::new("drive"))
            .with_remote("box2", RemoteEntry::new("dropbox"));
        let tool = FakeAuthorizer::default();
        let mut cache = TokenCache::new();

        let result = authorize_remotes(config, &tool, &mut cache).unwrap();

        assert_eq!(*tool.calls.borrow(), ["dropbox", "drive"]);
        assert_eq!(result.get("box").unwrap().token.as_deref(), Some("token-dropbox-1"));
        assert_eq!(result.get("gdrive").unwrap().token.as_deref(), Some("token-drive-2"));
        assert_eq!(result.get("box2").unwrap().token.as_deref(), Some("token-dropbox-1"));
    }

    #[test]
    fn test_existing_token_does_not_seed_cache() {
        let config = RetlConfig::new()
            .with_remote("old", RemoteEntry::new("drive").with_token("kept"))
            .with_remote("new", RemoteEntry::new("drive"));
        let tool = FakeAuthorizer::default();
        let mut cache = TokenCache::new();

        let result = authorize_remotes(config, &tool, &mut cache).unwrap();

        assert_eq!(result.get("old").unwrap().token.as_deref(), Some("kept"));
        assert_eq!(result.get("new").unwrap().token.as_deref(), Some("token-drive-1"));
    }

    #[test]
    fn test_cache_reused_across_calls() {
        let tool = FakeAuthorizer::default();
        let mut cache = TokenCache::new();
        cache.insert("drive", "from-earlier");

        let config = RetlConfig::new().with_remote("gdrive", RemoteEntry::new("drive"));
        let result = authorize_remotes(config, &tool, &mut cache).unwrap();

        assert!(tool.calls.borrow().is_empty());
        assert_eq!(result.get("gdrive").unwrap().token.as_deref(), Some("from-earlier"));
    }

    #[test]
    fn test_handshake_failure_propagates() {
        let config = RetlConfig::new().with_remote("gdrive", RemoteEntry::new("drive"));
        let tool = FakeAuthorizer {
            fail: true,
            ..Default::default()
        };
        let mut cache = TokenCache::new();

        let err = authorize_remotes(config, &tool, &mut cache).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(cache.is_empty());
    }
}
