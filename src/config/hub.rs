//! Defaults read from the `hub` command-line tool's configuration file.
//!
//! The file maps each host to a list of accounts:
//!
//! ```yaml
//! github.com:
//! - user: octocat
//!   oauth_token: ghp_xxx
//!   protocol: https
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::Deserialize;
use tracing::debug;

use crate::ports::FileSystem;

/// One account entry for a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HubAccount {
    /// Login name.
    #[serde(default)]
    pub user: Option<String>,
    /// API token.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// Preferred git protocol.
    #[serde(default)]
    pub protocol: Option<String>,
}

/// Parsed hub configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct HubConfig {
    hosts: BTreeMap<String, Vec<HubAccount>>,
}

impl HubConfig {
    /// Parses the YAML contents of a hub config file.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the contents do not have the expected shape.
    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Reads the file at `path`. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns a message if the file exists but cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Option<Self>, String> {
        if !fs.exists(path) {
            debug!(path = %path.display(), "no hub config");
            return Ok(None);
        }
        let contents = fs
            .read_to_string(path)
            .map_err(|e| format!("failed to read hub config {}: {e}", path.display()))?;
        Self::parse(&contents)
            .map(Some)
            .map_err(|e| format!("failed to parse hub config {}: {e}", path.display()))
    }

    /// The first account configured for `host`.
    #[must_use]
    pub fn account(&self, host: &str) -> Option<&HubAccount> {
        self.hosts.get(host).and_then(|accounts| accounts.first())
    }

    /// The token configured for `host`.
    #[must_use]
    pub fn token(&self, host: &str) -> Option<&str> {
        self.account(host).and_then(|a| a.oauth_token.as_deref()).filter(|t| !t.is_empty())
    }
}

/// Where hub keeps its configuration: `$HUB_CONFIG`, then
/// `$XDG_CONFIG_HOME/hub`, then `~/.config/hub`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    let var = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from);
    var("HUB_CONFIG")
        .or_else(|| var("XDG_CONFIG_HOME").map(|dir| dir.join("hub")))
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join(".config").join("hub")))
}
