//! Live adapter for the `IssueTracker` port using the GitHub REST API.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::error::TrackerError;
use crate::model::Credential;
use crate::ports::tracker::{IssuePage, IssueTracker, TrackerFuture};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const AGENT: &str = concat!("github-lockify/", env!("CARGO_PKG_VERSION"));

/// Live issue tracker that talks to GitHub over HTTPS.
pub struct GithubTracker {
    client: Client,
}

impl GithubTracker {
    /// Creates a new live tracker.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for GithubTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Error response body from the GitHub API.
#[derive(Deserialize)]
struct GithubError {
    message: String,
}

fn with_headers(request: RequestBuilder, credential: Option<&Credential>) -> RequestBuilder {
    let request = request.header(ACCEPT, GITHUB_ACCEPT).header(USER_AGENT, AGENT);
    match credential {
        Some(token) => request.header(AUTHORIZATION, format!("token {}", token.expose())),
        None => request,
    }
}

fn transport_error(method: &str, url: &str, err: &reqwest::Error) -> TrackerError {
    TrackerError::Transport {
        method: method.to_string(),
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Passes successful responses through and turns everything else into
/// [`TrackerError::Http`], preferring the API's own `message`.
async fn check_status(
    method: &str,
    url: &str,
    response: Response,
) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GithubError>(&body).map_or(body, |e| e.message);
    Err(TrackerError::Http {
        method: method.to_string(),
        url: url.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
///
/// Targets are delimited by `<…>` rather than split on commas, since query
/// strings (e.g. `labels=a,b`) may contain them.
#[must_use]
pub fn next_link(header: &str) -> Option<String> {
    let mut rest = header;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let close = after.find('>')?;
        let params_end = after[close + 1..].find('<').map_or(after.len(), |i| close + 1 + i);
        if after[close + 1..params_end].split(';').any(is_next_relation) {
            return Some(after[..close].to_string());
        }
        rest = &after[params_end..];
    }
    None
}

fn is_next_relation(param: &str) -> bool {
    param.trim().trim_end_matches(',').trim_end().strip_prefix("rel=").is_some_and(|rel| {
        rel.trim_matches('"').split_whitespace().any(|r| r.eq_ignore_ascii_case("next"))
    })
}

impl IssueTracker for GithubTracker {
    fn list_issues<'a>(
        &'a self,
        url: &'a str,
        credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, IssuePage> {
        Box::pin(async move {
            let response = with_headers(self.client.get(url), credential)
                .send()
                .await
                .map_err(|e| transport_error("GET", url, &e))?;
            let response = check_status("GET", url, response).await?;

            let next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_link);

            let body = response.text().await.map_err(|e| transport_error("GET", url, &e))?;
            let issues = serde_json::from_str(&body).map_err(|e| TrackerError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })?;

            Ok(IssuePage { issues, next })
        })
    }

    fn lock_issue<'a>(
        &'a self,
        url: &'a str,
        credential: Option<&'a Credential>,
    ) -> TrackerFuture<'a, ()> {
        Box::pin(async move {
            let response = with_headers(self.client.put(url), credential)
                .header(CONTENT_LENGTH, 0)
                .send()
                .await
                .map_err(|e| transport_error("PUT", url, &e))?;
            check_status("PUT", url, response).await?;
            Ok(())
        })
    }
}
