//! Git repository port for remote discovery.

use serde::{Deserialize, Serialize};

/// A configured git remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name, e.g. `origin`.
    pub name: String,
    /// Fetch URL of the remote.
    pub url: String,
}

/// Provides read access to the git repository in the working directory.
pub trait GitRepo: Send + Sync {
    /// Lists the remotes of the current repository, in `git remote` order.
    ///
    /// # Errors
    ///
    /// Returns an error if git is unavailable or the working directory is
    /// not inside a repository.
    fn remotes(&self) -> Result<Vec<GitRemote>, Box<dyn std::error::Error + Send + Sync>>;
}
