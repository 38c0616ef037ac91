//! Paginated retrieval of closed issues.
//!
//! The first request carries every server-side constraint; each later page
//! is requested at exactly the continuation URL the previous response
//! advertised. Any failing page aborts the whole fetch.

use reqwest::Url;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::endpoints;
use crate::error::TrackerError;
use crate::filter::FilterCriteria;
use crate::model::{Credential, Issue};
use crate::ports::IssueTracker;

/// Page size requested from the listing endpoint.
pub const PER_PAGE: u32 = 100;

/// Server-side constraints for the issue listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Labels that must all be present, sent comma-joined.
    pub labels: Vec<String>,
    /// Assignee login, or `none` for unassigned issues.
    pub assignee: Option<String>,
    /// Creator login.
    pub creator: Option<String>,
}

impl ListQuery {
    /// Extracts the constraints the server can evaluate.
    #[must_use]
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            labels: criteria.labels.iter().cloned().collect(),
            assignee: criteria.assignee.as_ref().map(|a| a.query_value().to_string()),
            creator: criteria.creator.clone(),
        }
    }

    /// Builds the first-page URL: closed issues, oldest first, full pages.
    #[must_use]
    pub fn first_page_url(&self, api_base: &Url, owner: &str, repo: &str) -> Url {
        let mut url = endpoints::issues_url(api_base, owner, repo);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("state", "closed")
                .append_pair("direction", "asc")
                .append_pair("per_page", &PER_PAGE.to_string());
            if !self.labels.is_empty() {
                query.append_pair("labels", &self.labels.join(","));
            }
            if let Some(assignee) = &self.assignee {
                query.append_pair("assignee", assignee);
            }
            if let Some(creator) = &self.creator {
                query.append_pair("creator", creator);
            }
        }
        url
    }
}

/// Lazy cursor over the pages of a listing.
///
/// Pages are fetched one at a time on demand; nothing is requested until
/// [`IssuePages::next_page`] is first awaited.
pub struct IssuePages<'a> {
    tracker: &'a dyn IssueTracker,
    credential: Option<&'a Credential>,
    next: Option<String>,
    pages: usize,
}

impl<'a> IssuePages<'a> {
    /// Starts a cursor at `first`.
    #[must_use]
    pub fn new(tracker: &'a dyn IssueTracker, credential: Option<&'a Credential>, first: Url) -> Self {
        Self { tracker, credential, next: Some(first.into()), pages: 0 }
    }

    /// Number of pages fetched so far.
    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetches the next page, or `None` once the listing is exhausted.
    ///
    /// After an error the cursor is exhausted; no later page is requested.
    ///
    /// # Errors
    ///
    /// Returns the tracker's error for the failing page.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Issue>>, TrackerError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };
        info!("Fetching {url} ...");
        let page = self.tracker.list_issues(&url, self.credential).await?;
        self.pages += 1;
        debug!(page = self.pages, issues = page.issues.len(), more = page.next.is_some(), "received page");
        self.next = page.next;
        Ok(Some(page.issues))
    }

    /// Drains the cursor into one list, in page order.
    ///
    /// # Errors
    ///
    /// Returns the first page error; issues from earlier pages are discarded.
    pub async fn collect_all(mut self) -> Result<Vec<Issue>, TrackerError> {
        let mut issues = Vec::new();
        while let Some(page) = self.next_page().await? {
            issues.extend(page);
        }
        Ok(issues)
    }
}

/// Fetches the closed issues of the configured repository.
pub struct IssueFetcher<'a> {
    tracker: &'a dyn IssueTracker,
    config: &'a RunConfig,
}

impl<'a> IssueFetcher<'a> {
    /// Creates a fetcher using `tracker` for transport.
    #[must_use]
    pub fn new(tracker: &'a dyn IssueTracker, config: &'a RunConfig) -> Self {
        Self { tracker, config }
    }

    /// The URL of the first page for this run.
    #[must_use]
    pub fn first_page_url(&self) -> Url {
        ListQuery::from_criteria(&self.config.criteria).first_page_url(
            &self.config.api_base,
            &self.config.owner,
            &self.config.repo,
        )
    }

    /// A lazy page cursor for this run.
    #[must_use]
    pub fn pages(&self) -> IssuePages<'a> {
        IssuePages::new(self.tracker, self.config.credential.as_ref(), self.first_page_url())
    }

    /// Fetches every page and concatenates the results.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub async fn fetch_all(&self) -> Result<Vec<Issue>, TrackerError> {
        self.pages().collect_all().await
    }
}
