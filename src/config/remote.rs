//! Owner and repository inference from git remote URLs.

use crate::ports::git::GitRemote;

/// An `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoSlug {
    /// Parses `owner/repo`, returning `None` unless both halves are non-empty.
    #[must_use]
    pub fn parse(slug: &str) -> Option<Self> {
        let slug = slug.trim_matches('/');
        let slug = slug.strip_suffix(".git").unwrap_or(slug);
        let (owner, repo) = slug.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self { owner: owner.to_string(), repo: repo.to_string() })
    }
}

/// Returns the path part of a remote URL when it points at `host`.
///
/// Handles `scheme://[user@]host[:port]/path` as well as the scp-like
/// `[user@]host:path` form.
fn path_on_host<'u>(url: &'u str, host: &str) -> Option<&'u str> {
    let (authority, path) = match url.split_once("://") {
        Some((_, rest)) => {
            let (authority, path) = rest.split_once('/')?;
            let authority = authority.rsplit('@').next()?;
            (authority.split(':').next()?, path)
        }
        None => {
            let (authority, path) = url.split_once(':')?;
            (authority.rsplit('@').next()?, path)
        }
    };
    authority.eq_ignore_ascii_case(host).then_some(path)
}

/// Parses a remote URL into a slug if it points at `host`.
#[must_use]
pub fn parse_remote_url(url: &str, host: &str) -> Option<RepoSlug> {
    path_on_host(url.trim(), host).and_then(RepoSlug::parse)
}

/// Picks the repository from the remotes: `origin` when it points at `host`,
/// otherwise the first remote that does.
#[must_use]
pub fn infer_slug(remotes: &[GitRemote], host: &str) -> Option<RepoSlug> {
    let origin = remotes
        .iter()
        .filter(|r| r.name == "origin")
        .find_map(|r| parse_remote_url(&r.url, host));
    origin.or_else(|| remotes.iter().find_map(|r| parse_remote_url(&r.url, host)))
}
