//! REST endpoint construction relative to the configured API root.

use reqwest::Url;

use crate::error::LockifyError;
use crate::model::LockRequest;

/// The public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Parses a user-supplied API root, rejecting anything that cannot carry a path.
///
/// # Errors
///
/// Returns [`LockifyError::InvalidApiUrl`] if `raw` is not an absolute
/// http(s) URL.
pub fn parse_api_base(raw: &str) -> Result<Url, LockifyError> {
    let invalid = |message: String| LockifyError::InvalidApiUrl { url: raw.to_string(), message };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("expected an http(s) URL".to_string()));
    }
    Ok(url)
}

/// `{api}/repos/{owner}/{repo}/{tail..}`, with each segment percent-encoded.
fn repo_endpoint(api_base: &Url, owner: &str, repo: &str, tail: &[&str]) -> Url {
    let mut url = api_base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["repos", owner, repo]).extend(tail);
    }
    url
}

/// The issue listing endpoint, without query parameters.
#[must_use]
pub fn issues_url(api_base: &Url, owner: &str, repo: &str) -> Url {
    repo_endpoint(api_base, owner, repo, &["issues"])
}

/// The lock endpoint for one issue, carrying the reason as `lock_reason`.
#[must_use]
pub fn lock_url(api_base: &Url, owner: &str, repo: &str, request: &LockRequest) -> Url {
    let number = request.number.to_string();
    let mut url = repo_endpoint(api_base, owner, repo, &["issues", &number, "lock"]);
    url.query_pairs_mut().append_pair("lock_reason", request.reason.api_value());
    url
}
